//! Shared test fixtures for agent unit tests.
#![cfg(test)]

use crate::deps::{create_deps, Deps};
use crate::embedding::{Embedder, HashEmbedder, PassthroughReranker};
use crate::registry::AgentRegistry;
use second_brain_core::config::{Config, MemoryProvider, ModelProvider};
use second_brain_memory::StubMemoryService;
use second_brain_storage::{InMemorySqlExecutor, SqlStorageService};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn test_config() -> Config {
    Config {
        user_id: "u1".to_string(),
        memory_provider: MemoryProvider::None,
        model_provider: ModelProvider::Auto,
        model_fallback_chain: Vec::new(),
        agent_model_overrides: HashMap::new(),
        memory_search_limit: 10,
        rerank_enabled: false,
        rerank_model: "voyage-rerank-2".to_string(),
        rerank_top_k: 10,
        rerank_oversample_multiplier: 2.0,
        hybrid_rrf_k: 60.0,
        hybrid_threshold: 0.0,
        hybrid_bm25_weight: 0.3,
        hybrid_vector_weight: 0.7,
        idle_reconnect_seconds: 240,
        api_key: None,
        tool_timeout: Duration::from_secs(2),
        deadline: Duration::from_secs(10),
    }
}

pub fn test_deps() -> Deps {
    test_deps_with_embedder(Arc::new(HashEmbedder::default()))
}

/// Like `test_deps`, but with a caller-supplied embedder, for tests that
/// need to observe embedding calls (e.g. a counting double).
pub fn test_deps_with_embedder(embedder: Arc<dyn Embedder>) -> Deps {
    let clock = Arc::new(second_brain_core::clock::SystemClock);
    create_deps(
        Arc::new(StubMemoryService::new(clock, Duration::from_secs(240))),
        Arc::new(SqlStorageService::new(Arc::new(InMemorySqlExecutor::default()))),
        test_config(),
        embedder,
        Arc::new(PassthroughReranker),
        AgentRegistry::new(HashMap::new()),
    )
}
