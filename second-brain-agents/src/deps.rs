//! The immutable dependency container threaded through every agent call
//! (§5.2). Built once per process and shared behind `Arc`; nothing in this
//! struct is mutated after construction.

use crate::embed_cache::EmbedCache;
use crate::embedding::{Embedder, Reranker};
use crate::registry::{self, AgentRegistry};
use second_brain_core::config::Config;
use second_brain_core::memory_service::MemoryService;
use second_brain_core::storage_service::StorageService;
use std::sync::Arc;

pub struct Deps {
    pub memory: Arc<dyn MemoryService>,
    pub storage: Arc<dyn StorageService>,
    pub config: Config,
    pub embed_cache: EmbedCache,
    pub embedder: Arc<dyn Embedder>,
    pub reranker: Arc<dyn Reranker>,
    pub registry: AgentRegistry,
}

#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn create_deps(
    memory: Arc<dyn MemoryService>,
    storage: Arc<dyn StorageService>,
    config: Config,
    embedder: Arc<dyn Embedder>,
    reranker: Arc<dyn Reranker>,
    registry: AgentRegistry,
) -> Deps {
    Deps {
        memory,
        storage,
        config,
        embed_cache: EmbedCache::new(),
        embedder,
        reranker,
        registry,
    }
}

/// Construct `Deps` with the fixed 13-agent fleet (§4.6): builds one
/// memory service, one storage service, one embedder, one reranker, and
/// the agent registry, in that order, exactly as spec.md describes
/// `create_deps()`.
#[must_use]
pub fn create_deps_with_fleet(
    memory: Arc<dyn MemoryService>,
    storage: Arc<dyn StorageService>,
    config: Config,
    embedder: Arc<dyn Embedder>,
    reranker: Arc<dyn Reranker>,
) -> Deps {
    create_deps(memory, storage, config, embedder, reranker, registry::default_fleet())
}
