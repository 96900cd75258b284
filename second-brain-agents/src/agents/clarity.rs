//! The `clarity` agent: collapses rambling text into a short, plain
//! restatement. A deterministic simplification, not a paraphrase model.

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

const MAX_CHARS: usize = 280;

#[derive(Deserialize)]
struct ClarityInput {
    text: String,
}

pub struct ClarityAgent;

fn clarify(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_CHARS {
        collapsed
    } else {
        let truncated: String = collapsed.chars().take(MAX_CHARS).collect();
        format!("{truncated}…")
    }
}

#[async_trait]
impl Agent for ClarityAgent {
    fn name(&self) -> &'static str {
        "clarity"
    }

    async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
        let request: ClarityInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(serde_json::json!({ "clarified": clarify(&request.text) }))
    }
}
