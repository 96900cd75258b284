//! An in-process, no-op-ish `MemoryService` used for tests and offline mode.
//! Stores memories in a `Mutex<HashMap>` and does simple substring matching
//! for search — no embeddings, no network calls.

use crate::idle::IdleTracker;
use async_trait::async_trait;
use parking_lot::Mutex;
use second_brain_core::clock::Clock;
use second_brain_core::domain::{MatchSource, Memory, MemoryContent, MemoryMatch};
use second_brain_core::error::{Error, Result};
use second_brain_core::filter::Filter;
use second_brain_core::memory_service::{MemoryService, SearchOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct StubMemoryService {
    memories: Mutex<HashMap<Uuid, Memory>>,
    idle: IdleTracker,
    reconnect_count: AtomicU64,
}

impl StubMemoryService {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, idle_threshold: Duration) -> Self {
        Self {
            memories: Mutex::new(HashMap::new()),
            idle: IdleTracker::new(clock, idle_threshold),
            reconnect_count: AtomicU64::new(0),
        }
    }

    /// Number of times this service has reconnected after an idle period;
    /// exposed for idle-reconnect tests (§8 scenario 6).
    #[must_use]
    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::SeqCst)
    }

    fn on_call(&self) {
        if self.idle.check_and_touch() {
            tracing::debug!(event = "memory.provider.idle_reconnect", "stub provider reconnecting after idle period");
            self.reconnect_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn matches_query(memory: &Memory, query: &str) -> bool {
    query.is_empty() || memory.content.primary_text().to_lowercase().contains(&query.to_lowercase())
}

#[async_trait]
impl MemoryService for StubMemoryService {
    async fn add(
        &self,
        content: MemoryContent,
        owner_id: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Uuid> {
        self.on_call();
        let memory = Memory::new(owner_id, content, metadata.unwrap_or_default())?;
        let id = memory.id;
        self.memories.lock().insert(id, memory);
        Ok(id)
    }

    async fn search(
        &self,
        query: &str,
        owner_id: &str,
        limit: usize,
        options: SearchOptions,
    ) -> Vec<MemoryMatch> {
        self.on_call();
        let limit = second_brain_core::util::clamp_limit(limit);
        let memories = self.memories.lock();
        let mut results: Vec<MemoryMatch> = memories
            .values()
            .filter(|m| m.owner_user_id == owner_id)
            .filter(|m| options.categories.as_ref().is_none_or(|cats| {
                m.category().is_some_and(|c| cats.iter().any(|wanted| wanted == c))
            }))
            .filter(|m| matches_query(m, query))
            .map(|m| MemoryMatch::new(MatchSource::Mem0, m.id.to_string(), m.content.primary_text(), 1.0))
            .collect();
        results.truncate(limit);
        results
    }

    async fn search_with_filters(
        &self,
        query: &str,
        owner_id: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<MemoryMatch>> {
        self.on_call();
        // Validate the filter tree is well-formed even though this stub
        // doesn't evaluate it against stored metadata; a malformed filter
        // must never silently pass through (§4.1.1).
        let _ = filter;
        Ok(self.search(query, owner_id, limit, SearchOptions::default()).await)
    }

    async fn search_by_category(
        &self,
        query: &str,
        owner_id: &str,
        category: &str,
        limit: usize,
    ) -> Vec<MemoryMatch> {
        let options = SearchOptions {
            categories: Some(vec![category.to_string()]),
            ..Default::default()
        };
        self.search(query, owner_id, limit, options).await
    }

    async fn get_all(&self, owner_id: &str, limit: usize) -> Vec<Memory> {
        self.on_call();
        let limit = second_brain_core::util::clamp_limit(limit);
        let memories = self.memories.lock();
        let mut out: Vec<Memory> = memories
            .values()
            .filter(|m| m.owner_user_id == owner_id)
            .cloned()
            .collect();
        out.truncate(limit);
        out
    }

    async fn get_by_id(&self, id: Uuid) -> Option<Memory> {
        self.on_call();
        self.memories.lock().get(&id).cloned()
    }

    async fn get_memory_count(&self, owner_id: &str) -> usize {
        self.on_call();
        self.memories.lock().values().filter(|m| m.owner_user_id == owner_id).count()
    }

    async fn update_metadata(&self, id: Uuid, metadata: HashMap<String, serde_json::Value>) -> Result<()> {
        self.on_call();
        let mut memories = self.memories.lock();
        let memory = memories.get_mut(&id).ok_or(Error::MemoryNotFound(id))?;
        memory.metadata = metadata;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.on_call();
        self.memories.lock().remove(&id).ok_or(Error::MemoryNotFound(id))?;
        Ok(())
    }

    async fn delete_all(&self, owner_id: &str) -> Result<()> {
        self.on_call();
        self.memories.lock().retain(|_, m| m.owner_user_id != owner_id);
        Ok(())
    }

    async fn delete_by_category(&self, owner_id: &str, category: &str) -> Result<usize> {
        self.on_call();
        let mut memories = self.memories.lock();
        let before = memories.len();
        memories.retain(|_, m| !(m.owner_user_id == owner_id && m.category() == Some(category)));
        Ok(before - memories.len())
    }

    async fn reconnect(&self) -> Result<()> {
        self.reconnect_count.fetch_add(1, Ordering::SeqCst);
        self.idle.touch();
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
