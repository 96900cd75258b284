//! Core persistent entities (§3 of the design): `Memory`, `Pattern`,
//! `Example`/`Knowledge`/`Experience`, `Project`, `Artifact`, `ContentType`,
//! and the transient `MemoryMatch`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single block of multimodal content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modality", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { url: String },
    Pdf { url: String },
    Video { url: String },
}

/// Content attached to a memory: either plain text or a composition of
/// multimodal blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MemoryContent {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            MemoryContent::Text(s) => s.trim().is_empty(),
            MemoryContent::Blocks(b) => b.is_empty(),
        }
    }

    /// The primary text used for dedup identity and logging: the raw string
    /// for text content, or the concatenation of any text blocks otherwise.
    #[must_use]
    pub fn primary_text(&self) -> String {
        match self {
            MemoryContent::Text(s) => s.clone(),
            MemoryContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// A stored memory owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub owner_user_id: String,
    pub content: MemoryContent,
    pub metadata: HashMap<String, serde_json::Value>,
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// Construct a new memory, validating the non-empty-content invariant
    /// from §3 (`content non-empty; owner required`).
    pub fn new(
        owner_user_id: impl Into<String>,
        content: MemoryContent,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Result<Self> {
        let owner_user_id = owner_user_id.into();
        if owner_user_id.trim().is_empty() {
            return Err(Error::InvalidInput("owner_user_id is required".into()));
        }
        if content.is_empty() {
            return Err(Error::InvalidInput("content must not be empty".into()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_user_id,
            content,
            metadata,
            embedding: None,
            created_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.metadata.get("category").and_then(|v| v.as_str())
    }
}

/// A learned pattern, reinforced idempotently as it recurs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Uuid,
    pub owner_user_id: String,
    pub topic: String,
    pub content: String,
    pub confidence: f32,
    pub keywords: Vec<String>,
    pub last_reinforced_at: DateTime<Utc>,
}

impl Pattern {
    pub fn new(
        owner_user_id: impl Into<String>,
        topic: impl Into<String>,
        content: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_user_id: owner_user_id.into(),
            topic: topic.into(),
            content: content.into(),
            confidence: 0.5,
            keywords,
            last_reinforced_at: Utc::now(),
        }
    }

    /// Stable identity used for idempotent upsert: `(owner, topic,
    /// content-hash)`.
    #[must_use]
    pub fn identity_key(&self) -> (String, String, u64) {
        (
            self.owner_user_id.clone(),
            self.topic.clone(),
            crate::util::content_hash64(&self.content),
        )
    }

    /// Reinforce this pattern, raising confidence by `delta` without ever
    /// decreasing it (monotonic non-decreasing invariant from §3).
    pub fn reinforce(&mut self, delta: f32) {
        self.confidence = (self.confidence + delta.max(0.0)).min(1.0);
        self.last_reinforced_at = Utc::now();
    }
}

/// Category for `Example`/`Knowledge`/`Experience` rows; they share a shape
/// and differ only by the table they live in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedEntry {
    pub id: Uuid,
    pub owner_user_id: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

impl CategorizedEntry {
    pub fn new(
        owner_user_id: impl Into<String>,
        content: impl Into<String>,
        category: Option<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_user_id: owner_user_id.into(),
            content: content.into(),
            category,
            tags,
            embedding: None,
            created_at: Utc::now(),
        }
    }
}

/// Project lifecycle stage. Transitions follow the partial order
/// `planning → executing → reviewing → learning → complete`, with `archived`
/// reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Planning,
    Executing,
    Reviewing,
    Learning,
    Complete,
    Archived,
}

impl LifecycleStage {
    fn rank(self) -> Option<u8> {
        match self {
            LifecycleStage::Planning => Some(0),
            LifecycleStage::Executing => Some(1),
            LifecycleStage::Reviewing => Some(2),
            LifecycleStage::Learning => Some(3),
            LifecycleStage::Complete => Some(4),
            LifecycleStage::Archived => None,
        }
    }

    /// Whether advancing from `self` to `next` is a legal transition.
    #[must_use]
    pub fn can_advance_to(self, next: LifecycleStage) -> bool {
        if next == LifecycleStage::Archived {
            return true;
        }
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to == from + 1,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_user_id: String,
    pub title: String,
    pub description: String,
    pub lifecycle_stage: LifecycleStage,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(owner_user_id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_user_id: owner_user_id.into(),
            title: title.into(),
            description: description.into(),
            lifecycle_stage: LifecycleStage::Planning,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance the project's lifecycle stage, enforcing the partial order
    /// invariant from §3.
    pub fn advance(&mut self, next: LifecycleStage) -> Result<()> {
        if !self.lifecycle_stage.can_advance_to(next) {
            return Err(Error::Conflict(format!(
                "cannot advance project from {:?} to {:?}",
                self.lifecycle_stage, next
            )));
        }
        self.lifecycle_stage = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Plan,
    Research,
    Output,
    Review,
    Learnings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: Uuid,
    pub project_id: Uuid,
    pub artifact_type: ArtifactType,
    pub title: String,
    pub content: String,
}

/// A configuration for a pluggable content type, driving generation,
/// grouping, and validation (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeConfig {
    pub slug: String,
    pub display_name: String,
    pub category: ContentCategory,
    pub is_builtin: bool,
    pub description: String,
    pub writing_instructions: String,
    pub length_guidance: String,
    pub ui_config: serde_json::Value,
}

/// Fixed category ordering used by `group_content_types_by_category`:
/// content categories first, then knowledge categories, then "other".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Content,
    Knowledge,
    Other,
}

impl ContentCategory {
    #[must_use]
    pub fn sort_rank(self) -> u8 {
        match self {
            ContentCategory::Content => 0,
            ContentCategory::Knowledge => 1,
            ContentCategory::Other => 2,
        }
    }
}

/// Source a `MemoryMatch` was retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Mem0,
    Vector,
    Bm25,
    Graph,
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchSource::Mem0 => "mem0",
            MatchSource::Vector => "vector",
            MatchSource::Bm25 => "bm25",
            MatchSource::Graph => "graph",
        };
        f.write_str(s)
    }
}

/// A single retrieval result flowing through the recall pipeline's state
/// machine (§4.3.5): `raw → (fused?) → (reranked?) → (deduplicated?) →
/// formatted`. Each stage sets exactly the fields it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMatch {
    pub source: MatchSource,
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, serde_json::Value>,
    /// Provider-native score for a single-source result, or RRF fused score
    /// once fusion has run. Always present after fusion.
    pub score: f32,
    /// Reranker's own score; present only after a rerank pass has run.
    pub rerank_score: Option<f32>,
    /// Every source that contributed to this item after fusion.
    pub contributing_sources: Vec<MatchSource>,
}

impl MemoryMatch {
    #[must_use]
    pub fn new(source: MatchSource, id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            source,
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            score,
            rerank_score: None,
            contributing_sources: vec![source],
        }
    }

    /// The score that should be used for ranking: rerank score when present,
    /// otherwise the fused/provider-native score (§4.3.4).
    #[must_use]
    pub fn ranking_score(&self) -> f32 {
        self.rerank_score.unwrap_or(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_rejects_empty_content() {
        let err = Memory::new("u1", MemoryContent::Text(String::new()), HashMap::new());
        assert!(err.is_err());
    }

    #[test]
    fn memory_rejects_missing_owner() {
        let err = Memory::new("", MemoryContent::Text("hello".into()), HashMap::new());
        assert!(err.is_err());
    }

    #[test]
    fn pattern_confidence_is_monotonic_non_decreasing() {
        let mut p = Pattern::new("u1", "auth", "use refresh tokens", vec![]);
        let before = p.confidence;
        p.reinforce(0.1);
        assert!(p.confidence >= before);
        p.reinforce(-5.0); // negative delta must not decrease confidence
        assert!(p.confidence >= before);
    }

    #[test]
    fn pattern_confidence_caps_at_one() {
        let mut p = Pattern::new("u1", "auth", "x", vec![]);
        for _ in 0..100 {
            p.reinforce(0.5);
        }
        assert!(p.confidence <= 1.0);
    }

    #[test]
    fn lifecycle_stage_follows_partial_order() {
        let mut project = Project::new("u1", "t", "d");
        assert!(project.advance(LifecycleStage::Executing).is_ok());
        assert!(project.advance(LifecycleStage::Learning).is_err()); // skips reviewing
        assert!(project.advance(LifecycleStage::Reviewing).is_ok());
    }

    #[test]
    fn lifecycle_stage_archives_from_any_state() {
        let mut project = Project::new("u1", "t", "d");
        assert!(project.advance(LifecycleStage::Archived).is_ok());
    }

    #[test]
    fn ranking_score_prefers_rerank_score() {
        let mut m = MemoryMatch::new(MatchSource::Mem0, "1", "content", 0.4);
        assert_eq!(m.ranking_score(), 0.4);
        m.rerank_score = Some(0.9);
        assert_eq!(m.ranking_score(), 0.9);
    }
}
