//! The `learn` agent: extracts a pattern from observed text and upserts it
//! idempotently through the storage service (§4.2, §6.1).

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::domain::Pattern;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct LearnInput {
    topic: String,
    content: String,
    #[serde(default)]
    keywords: Vec<String>,
}

pub struct LearnAgent;

#[async_trait]
impl Agent for LearnAgent {
    fn name(&self) -> &'static str {
        "learn"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: LearnInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        if request.topic.trim().is_empty() || request.content.trim().is_empty() {
            return Err(Error::InvalidInput("topic and content must be non-empty".to_string()));
        }
        let pattern = Pattern::new(deps.config.user_id.clone(), request.topic, request.content, request.keywords);
        let patterns = deps.storage.upsert_patterns(&deps.config.user_id, vec![pattern]).await?;
        Ok(serde_json::json!({ "patterns": patterns }))
    }
}
