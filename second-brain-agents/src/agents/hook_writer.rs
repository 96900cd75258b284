//! The `hook_writer` agent: produces a short attention-grabbing opening
//! line for a topic, deterministically templated.

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

const TEMPLATES: [&str; 3] = [
    "Here's what nobody tells you about {topic}.",
    "{topic} is harder than it looks — here's why.",
    "Three minutes on {topic} that will change how you think about it.",
];

#[derive(Deserialize)]
struct HookWriterInput {
    topic: String,
}

pub struct HookWriterAgent;

#[async_trait]
impl Agent for HookWriterAgent {
    fn name(&self) -> &'static str {
        "hook_writer"
    }

    async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
        let request: HookWriterInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        if request.topic.trim().is_empty() {
            return Err(Error::InvalidInput("topic must be non-empty".to_string()));
        }
        let index = (second_brain_core::util::content_hash64(&request.topic) as usize) % TEMPLATES.len();
        let hook = TEMPLATES[index].replace("{topic}", request.topic.trim());
        Ok(serde_json::json!({ "hook": hook }))
    }
}
