//! The `StorageService` trait (§4.2): CRUD over the structured tables plus
//! the hybrid-search RPC surface.

use crate::domain::{Artifact, ArtifactType, CategorizedEntry, ContentTypeConfig, LifecycleStage, MemoryMatch, Pattern, Project};
use crate::error::{Error, Result};
use async_trait::async_trait;
use uuid::Uuid;

/// Tables reachable through `hybrid_search`/`vector_search`. Any other
/// table name must be rejected with `Error::InvalidInput` before a query is
/// ever built (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchableTable {
    Patterns,
    Examples,
    Knowledge,
    Experiences,
}

impl SearchableTable {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchableTable::Patterns => "patterns",
            SearchableTable::Examples => "examples",
            SearchableTable::Knowledge => "knowledge",
            SearchableTable::Experiences => "experiences",
        }
    }

    /// Parse a caller-supplied table name against the whitelist, rejecting
    /// anything else with `InvalidInput` (§4.2).
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "patterns" => Ok(SearchableTable::Patterns),
            "examples" => Ok(SearchableTable::Examples),
            "knowledge" => Ok(SearchableTable::Knowledge),
            "experiences" => Ok(SearchableTable::Experiences),
            other => Err(Error::InvalidInput(format!(
                "table '{other}' is not searchable; must be one of patterns, examples, knowledge, experiences"
            ))),
        }
    }
}

/// Tuning knobs for the hybrid-search RPC (§6.4).
#[derive(Debug, Clone, Copy)]
pub struct HybridSearchParams {
    pub rrf_k: f64,
    pub bm25_weight: f32,
    pub vector_weight: f32,
    pub threshold: f32,
}

impl Default for HybridSearchParams {
    fn default() -> Self {
        Self {
            rrf_k: crate::recall::DEFAULT_RRF_K,
            bm25_weight: 0.3,
            vector_weight: 0.7,
            threshold: 0.0,
        }
    }
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// BM25 + pgvector fusion over a single whitelisted table (§4.2, §6.4).
    async fn hybrid_search(
        &self,
        table: SearchableTable,
        query: &str,
        owner_id: &str,
        embedding: &[f32],
        limit: usize,
        params: HybridSearchParams,
    ) -> Result<Vec<MemoryMatch>>;

    /// Pure vector similarity over a single whitelisted table.
    async fn vector_search(
        &self,
        table: SearchableTable,
        embedding: &[f32],
        owner_id: &str,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<MemoryMatch>>;

    async fn get_entry(&self, table: SearchableTable, id: Uuid) -> Result<Option<CategorizedEntry>>;

    async fn insert_entry(&self, table: SearchableTable, entry: CategorizedEntry) -> Result<Uuid>;

    async fn delete_entry(&self, table: SearchableTable, id: Uuid) -> Result<()>;

    /// Idempotent by `(owner, topic, content-hash)`; reinforces confidence
    /// through `reinforce_pattern` when a duplicate is seen (§4.2).
    async fn upsert_patterns(&self, owner_id: &str, patterns: Vec<Pattern>) -> Result<Vec<Pattern>>;

    async fn create_project(&self, project: Project) -> Result<Project>;

    async fn update_project(&self, project: Project) -> Result<Project>;

    async fn advance_project(&self, project_id: Uuid, stage: LifecycleStage) -> Result<Project>;

    async fn list_projects(&self, owner_id: &str) -> Result<Vec<Project>>;

    async fn add_artifact(
        &self,
        project_id: Uuid,
        artifact_type: ArtifactType,
        title: &str,
        content: &str,
    ) -> Result<Artifact>;

    async fn delete_artifact(&self, project_id: Uuid, artifact_type: ArtifactType) -> Result<()>;

    async fn list_artifacts(&self, project_id: Uuid) -> Result<Vec<Artifact>>;

    /// Content-type registry: union of built-ins and user-added types.
    async fn list_content_types(&self) -> Result<Vec<ContentTypeConfig>>;

    async fn add_content_type(&self, config: ContentTypeConfig) -> Result<()>;

    /// Fails with `Error::Conflict` on built-ins, `Error::NotFound` if the
    /// user type doesn't exist (§4.2, §8 property 10).
    async fn remove_content_type(&self, slug: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_accepts_exactly_four_tables() {
        for name in ["patterns", "examples", "knowledge", "experiences"] {
            assert!(SearchableTable::parse(name).is_ok());
        }
    }

    #[test]
    fn whitelist_rejects_other_tables() {
        for name in ["projects", "project_artifacts", "content_types", "users", "'; DROP TABLE patterns; --"] {
            assert!(SearchableTable::parse(name).is_err());
        }
    }
}
