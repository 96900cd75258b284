//! The `MemoryService` trait (§4.1): a 14-method capability set implemented
//! identically by every concrete semantic-memory provider.

use crate::domain::{Memory, MemoryContent, MemoryMatch};
use crate::error::Result;
use crate::filter::Filter;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-call flag overrides of provider defaults (§4.1).
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub extended: bool,
    pub rerank: bool,
    pub categories: Option<Vec<String>>,
    pub threshold: Option<f32>,
    /// Per-call scope override; when set, used in place of the configured
    /// owner. Mixing scopes within one call is forbidden at the service
    /// layer (§5 multi-tenancy).
    pub override_user_id: Option<String>,
}

/// A memory provider: cloud semantic store, knowledge graph, or stub.
///
/// Every implementation MUST perform idle reconnect (§4.1.2) identically so
/// that callers can treat instances as interchangeable, and MUST surface
/// provider failures as the documented empty fallback rather than an error
/// (§4.1.3) — the `Result` here is reserved for caller-side contract
/// violations (bad input, mixed scopes), not provider failures.
#[async_trait]
pub trait MemoryService: Send + Sync {
    async fn add(
        &self,
        content: MemoryContent,
        owner_id: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Uuid>;

    /// Add several memories in one round trip. Default implementation calls
    /// [`MemoryService::add`] once per item; providers with a native batch
    /// endpoint should override it.
    async fn add_batch(
        &self,
        items: Vec<(MemoryContent, Option<HashMap<String, serde_json::Value>>)>,
        owner_id: &str,
    ) -> Result<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(items.len());
        for (content, metadata) in items {
            ids.push(self.add(content, owner_id, metadata).await?);
        }
        Ok(ids)
    }

    async fn search(
        &self,
        query: &str,
        owner_id: &str,
        limit: usize,
        options: SearchOptions,
    ) -> Vec<MemoryMatch>;

    async fn search_with_filters(
        &self,
        query: &str,
        owner_id: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<MemoryMatch>>;

    async fn search_by_category(
        &self,
        query: &str,
        owner_id: &str,
        category: &str,
        limit: usize,
    ) -> Vec<MemoryMatch>;

    async fn get_all(&self, owner_id: &str, limit: usize) -> Vec<Memory>;

    async fn get_by_id(&self, id: Uuid) -> Option<Memory>;

    async fn get_memory_count(&self, owner_id: &str) -> usize;

    /// Replace a memory's metadata in place. Content itself is immutable
    /// once stored (§3: "mutated only by the memory provider") — this is
    /// how the provider performs that mutation (e.g. tag updates).
    async fn update_metadata(
        &self,
        id: Uuid,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn delete_all(&self, owner_id: &str) -> Result<()>;

    async fn delete_by_category(&self, owner_id: &str, category: &str) -> Result<usize>;

    /// Force an idle-reconnect cycle immediately, regardless of the idle
    /// threshold. Exposed so operators/tests can exercise §4.1.2 directly.
    async fn reconnect(&self) -> Result<()>;

    /// Whether the underlying provider currently looks reachable.
    async fn health_check(&self) -> bool;
}
