//! The `specialist` agent: a domain-scoped pass over a piece of text,
//! tagging it with the requested domain rather than running a general
//! analysis. Stands in for the real domain-expert model calls.

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct SpecialistInput {
    domain: String,
    text: String,
}

pub struct SpecialistAgent;

#[async_trait]
impl Agent for SpecialistAgent {
    fn name(&self) -> &'static str {
        "specialist"
    }

    async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
        let request: SpecialistInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        if request.domain.trim().is_empty() {
            return Err(Error::InvalidInput("domain must be non-empty".to_string()));
        }
        let analysis = format!("[{}] {}", request.domain, request.text.trim());
        Ok(serde_json::json!({ "domain": request.domain, "analysis": analysis }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::test_deps;

    #[tokio::test]
    async fn tags_the_analysis_with_the_requested_domain() {
        let deps = test_deps();
        let output = SpecialistAgent
            .run(serde_json::json!({"domain": "security", "text": "rotate keys quarterly"}), &deps)
            .await
            .unwrap();
        assert!(output["analysis"].as_str().unwrap().starts_with("[security]"));
    }
}
