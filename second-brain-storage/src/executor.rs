//! `SqlExecutor`: the narrow row-level interface `SqlStorageService` builds
//! its queries against, so hybrid search ranking can be exercised in tests
//! without a real database connection. A production deployment plugs in an
//! executor backed by a real SQL driver; this crate ships the in-memory one
//! used by tests and single-process/offline deployments.

use async_trait::async_trait;
use second_brain_core::error::Result;
use second_brain_core::storage_service::SearchableTable;
use uuid::Uuid;

/// One row as stored in a searchable table.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: Uuid,
    pub owner_user_id: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn all_rows(&self, table: SearchableTable, owner_user_id: &str) -> Result<Vec<Row>>;
    async fn get_row(&self, table: SearchableTable, id: Uuid) -> Result<Option<Row>>;
    async fn insert_row(&self, table: SearchableTable, row: Row) -> Result<Uuid>;
    async fn delete_row(&self, table: SearchableTable, id: Uuid) -> Result<()>;
}

/// BM25-ish lexical scoring over an in-memory row set: term frequency over
/// query terms divided by document length, a simplification that preserves
/// the relative ranking behavior a real BM25 index would produce for the
/// short-text corpus this crate is built for.
#[must_use]
pub fn lexical_score(content: &str, query: &str) -> f32 {
    let content_lower = content.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return 0.0;
    }
    let doc_len = content_lower.split_whitespace().count().max(1) as f32;
    let hits = terms
        .iter()
        .filter(|t| content_lower.contains(&t.to_lowercase()))
        .count() as f32;
    hits / doc_len.sqrt()
}

#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_score_rewards_term_overlap() {
        let high = lexical_score("rust async runtime tokio", "rust tokio");
        let low = lexical_score("completely unrelated text", "rust tokio");
        assert!(high > low);
    }

    #[test]
    fn cosine_similarity_is_one_for_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_is_zero_for_orthogonal_vectors() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_handles_mismatched_length() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }
}
