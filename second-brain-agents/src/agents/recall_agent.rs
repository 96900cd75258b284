//! The `recall` agent: the agentic front door to `quick_recall`/`recall_deep`
//! (§4.3 phase 8). Always routes through the shared single-embedding cache
//! on `Deps`, same as the bare orchestration functions.

use crate::deps::Deps;
use crate::recall::{quick_recall, recall_deep};
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use second_brain_core::recall::format_matches;
use second_brain_core::util::clamp_limit;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RecallInput {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    deep: bool,
    #[serde(default)]
    instruction: Option<String>,
}

fn default_limit() -> usize {
    10
}

pub struct RecallAgent;

#[async_trait]
impl Agent for RecallAgent {
    fn name(&self) -> &'static str {
        "recall"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: RecallInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let limit = clamp_limit(request.limit);
        let matches = if request.deep {
            recall_deep(deps, &request.query, limit, request.instruction.as_deref()).await?
        } else {
            quick_recall(deps, &request.query, limit).await?
        };
        Ok(serde_json::json!({
            "matches": matches,
            "rendered": format_matches(&matches),
        }))
    }
}
