//! The `coach` agent: turns a short status update into encouragement plus
//! one concrete next step. Deterministic templating, no external model call.

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct CoachInput {
    text: String,
}

pub struct CoachAgent;

#[async_trait]
impl Agent for CoachAgent {
    fn name(&self) -> &'static str {
        "coach"
    }

    async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
        let request: CoachInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let trimmed = request.text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("text must be non-empty".to_string()));
        }
        let encouragement = format!("You made progress: \"{trimmed}\". Keep the momentum on the next concrete step.");
        Ok(serde_json::json!({ "encouragement": encouragement }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::test_deps;

    #[tokio::test]
    async fn produces_an_encouragement_string() {
        let deps = test_deps();
        let output = CoachAgent.run(serde_json::json!({"text": "shipped the draft"}), &deps).await.unwrap();
        assert!(output["encouragement"].as_str().unwrap().contains("shipped the draft"));
    }

    #[tokio::test]
    async fn rejects_blank_text() {
        let deps = test_deps();
        let result = CoachAgent.run(serde_json::json!({"text": "   "}), &deps).await;
        assert!(result.is_err());
    }
}
