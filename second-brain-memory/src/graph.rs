//! `MemoryService` backed by an in-process directed graph of entities and
//! relations, standing in for a knowledge-graph provider (§6.3). Memories
//! are graph nodes; a `related_to` metadata key (a list of memory ids)
//! creates edges, which search uses as a secondary ranking signal.

use crate::idle::IdleTracker;
use async_trait::async_trait;
use parking_lot::Mutex;
use second_brain_core::clock::Clock;
use second_brain_core::domain::{MatchSource, Memory, MemoryContent, MemoryMatch};
use second_brain_core::error::{Error, Result};
use second_brain_core::filter::Filter;
use second_brain_core::memory_service::{MemoryService, SearchOptions};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

struct GraphState {
    nodes: HashMap<Uuid, Memory>,
    edges: HashMap<Uuid, HashSet<Uuid>>,
}

impl GraphState {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    fn related_ids(metadata: &HashMap<String, serde_json::Value>) -> Vec<Uuid> {
        metadata
            .get("related_to")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| Uuid::parse_str(s).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Degree centrality within the owner's subgraph: how many edges touch
    /// this node, used to bump matches that are well-connected.
    fn degree(&self, id: Uuid) -> usize {
        let outgoing = self.edges.get(&id).map_or(0, HashSet::len);
        let incoming = self.edges.values().filter(|targets| targets.contains(&id)).count();
        outgoing + incoming
    }
}

pub struct GraphMemoryService {
    state: Mutex<GraphState>,
    idle: IdleTracker,
    reconnect_count: AtomicU64,
}

impl GraphMemoryService {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, idle_threshold: Duration) -> Self {
        Self {
            state: Mutex::new(GraphState::new()),
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
            tracing::debug!(event = "memory.provider.idle_reconnect", "graph provider reconnecting after idle period");
            self.reconnect_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl MemoryService for GraphMemoryService {
    async fn add(
        &self,
        content: MemoryContent,
        owner_id: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Uuid> {
        self.on_call();
        let metadata = metadata.unwrap_or_default();
        let related = GraphState::related_ids(&metadata);
        let memory = Memory::new(owner_id, content, metadata)?;
        let id = memory.id;
        let mut state = self.state.lock();
        state.nodes.insert(id, memory);
        state.edges.entry(id).or_default().extend(related);
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
        let state = self.state.lock();
        let query_lower = query.to_lowercase();
        let mut results: Vec<MemoryMatch> = state
            .nodes
            .values()
            .filter(|m| m.owner_user_id == owner_id)
            .filter(|m| options.categories.as_ref().is_none_or(|cats| {
                m.category().is_some_and(|c| cats.iter().any(|wanted| wanted == c))
            }))
            .filter(|m| query_lower.is_empty() || m.content.primary_text().to_lowercase().contains(&query_lower))
            .map(|m| {
                let centrality = state.degree(m.id) as f32;
                let score = 1.0 + centrality * 0.05;
                MemoryMatch::new(MatchSource::Graph, m.id.to_string(), m.content.primary_text(), score)
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
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
        let state = self.state.lock();
        let mut out: Vec<Memory> = state.nodes.values().filter(|m| m.owner_user_id == owner_id).cloned().collect();
        out.truncate(limit);
        out
    }

    async fn get_by_id(&self, id: Uuid) -> Option<Memory> {
        self.on_call();
        self.state.lock().nodes.get(&id).cloned()
    }

    async fn get_memory_count(&self, owner_id: &str) -> usize {
        self.on_call();
        self.state.lock().nodes.values().filter(|m| m.owner_user_id == owner_id).count()
    }

    async fn update_metadata(&self, id: Uuid, metadata: HashMap<String, serde_json::Value>) -> Result<()> {
        self.on_call();
        let related = GraphState::related_ids(&metadata);
        let mut state = self.state.lock();
        let memory = state.nodes.get_mut(&id).ok_or(Error::MemoryNotFound(id))?;
        memory.metadata = metadata;
        state.edges.entry(id).or_default().extend(related);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.on_call();
        let mut state = self.state.lock();
        state.nodes.remove(&id).ok_or(Error::MemoryNotFound(id))?;
        state.edges.remove(&id);
        for targets in state.edges.values_mut() {
            targets.remove(&id);
        }
        Ok(())
    }

    async fn delete_all(&self, owner_id: &str) -> Result<()> {
        self.on_call();
        let mut state = self.state.lock();
        let ids: Vec<Uuid> = state
            .nodes
            .iter()
            .filter(|(_, m)| m.owner_user_id == owner_id)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            state.nodes.remove(&id);
            state.edges.remove(&id);
        }
        Ok(())
    }

    async fn delete_by_category(&self, owner_id: &str, category: &str) -> Result<usize> {
        self.on_call();
        let mut state = self.state.lock();
        let ids: Vec<Uuid> = state
            .nodes
            .iter()
            .filter(|(_, m)| m.owner_user_id == owner_id && m.category() == Some(category))
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            state.nodes.remove(id);
            state.edges.remove(id);
        }
        Ok(ids.len())
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

#[cfg(test)]
mod tests {
    use super::*;
    use second_brain_core::clock::SystemClock;
    use serde_json::json;

    fn service() -> GraphMemoryService {
        GraphMemoryService::new(Arc::new(SystemClock), Duration::from_secs(240))
    }

    #[tokio::test]
    async fn related_memories_rank_above_isolated_ones() {
        let svc = service();
        let a = svc.add(MemoryContent::Text("project kickoff notes".into()), "u1", None).await.unwrap();
        let mut meta = HashMap::new();
        meta.insert("related_to".to_string(), json!([a.to_string()]));
        svc.add(MemoryContent::Text("project kickoff followups".into()), "u1", Some(meta)).await.unwrap();
        svc.add(MemoryContent::Text("project kickoff unrelated".into()), "u1", None).await.unwrap();

        let results = svc.search("project kickoff", "u1", 10, SearchOptions::default()).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].score >= results[2].score);
    }

    #[tokio::test]
    async fn delete_removes_dangling_edges() {
        let svc = service();
        let a = svc.add(MemoryContent::Text("a".into()), "u1", None).await.unwrap();
        let mut meta = HashMap::new();
        meta.insert("related_to".to_string(), json!([a.to_string()]));
        let b = svc.add(MemoryContent::Text("b".into()), "u1", Some(meta)).await.unwrap();
        svc.delete(a).await.unwrap();
        assert!(svc.get_by_id(b).await.is_some());
        assert!(svc.get_by_id(a).await.is_none());
    }

    #[tokio::test]
    async fn idle_call_reconnects_exactly_once() {
        use second_brain_core::clock::TestClock;

        let clock = Arc::new(TestClock::new(chrono::Utc::now()));
        let svc = GraphMemoryService::new(clock.clone(), Duration::from_secs(240));
        assert_eq!(svc.reconnect_count(), 0);

        clock.advance(chrono::Duration::seconds(300));
        svc.search("anything", "u1", 10, SearchOptions::default()).await;
        assert_eq!(svc.reconnect_count(), 1);

        svc.search("anything", "u1", 10, SearchOptions::default()).await;
        assert_eq!(svc.reconnect_count(), 1);
    }
}
