//! The `review` agent: scores a piece of content heuristically and records
//! it as a `Review` artifact on a project (§6 Project/Artifact model).

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::domain::ArtifactType;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

const SIGNAL_WORDS: [&str; 6] = ["because", "therefore", "evidence", "specifically", "example", "data"];

#[derive(Deserialize)]
struct ReviewInput {
    project_id: Uuid,
    content: String,
}

pub struct ReviewAgent;

/// A crude readability/substance heuristic in `[0, 10]`: rewards length up
/// to a point and the presence of reasoning signal words, never a
/// replacement for real judgment, just enough to produce a stable score.
fn score_content(content: &str) -> f32 {
    let words = content.split_whitespace().count() as f32;
    let length_score = (words / 40.0).min(1.0) * 6.0;
    let lower = content.to_lowercase();
    let signal_hits = SIGNAL_WORDS.iter().filter(|w| lower.contains(*w)).count() as f32;
    let signal_score = (signal_hits / SIGNAL_WORDS.len() as f32) * 4.0;
    (length_score + signal_score).clamp(0.0, 10.0)
}

#[async_trait]
impl Agent for ReviewAgent {
    fn name(&self) -> &'static str {
        "review"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: ReviewInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let score = score_content(&request.content);
        let artifact = deps
            .storage
            .add_artifact(request.project_id, ArtifactType::Review, "Review", &format!("score: {score:.1}\n\n{}", request.content))
            .await?;
        Ok(serde_json::json!({ "score": score, "artifact": artifact }))
    }
}
