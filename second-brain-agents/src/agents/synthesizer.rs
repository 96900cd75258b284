//! The `synthesizer` agent: combines a set of recall matches into a single
//! ordered summary, highest-scoring first.

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::domain::MemoryMatch;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct SynthesizerInput {
    matches: Vec<MemoryMatch>,
}

pub struct SynthesizerAgent;

#[async_trait]
impl Agent for SynthesizerAgent {
    fn name(&self) -> &'static str {
        "synthesizer"
    }

    async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
        let request: SynthesizerInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let mut matches = request.matches;
        matches.sort_by(|a, b| b.ranking_score().partial_cmp(&a.ranking_score()).unwrap_or(std::cmp::Ordering::Equal));
        let summary = matches
            .iter()
            .map(|m| format!("- {}", m.content))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(serde_json::json!({ "summary": summary }))
    }
}
