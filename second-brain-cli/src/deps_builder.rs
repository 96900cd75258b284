//! Builds the shared `Deps` container from environment configuration,
//! mirroring `second-brain-mcp`'s server bootstrap (§4.6).

use second_brain_agents::embedding::{FallbackEmbedder, HashEmbedder, PassthroughReranker};
use second_brain_agents::{create_deps_with_fleet, Deps};
use second_brain_core::clock::SystemClock;
use second_brain_core::config::{Config, MemoryProvider};
use second_brain_memory::{CloudMemoryService, GraphMemoryService, StubMemoryService};
use second_brain_storage::{InMemorySqlExecutor, SqlStorageService};
use std::sync::Arc;
use std::time::Duration;

pub fn build_deps(config: Config) -> anyhow::Result<Deps> {
    let clock = Arc::new(SystemClock);
    let idle = Duration::from_secs(config.idle_reconnect_seconds);

    let memory: Arc<dyn second_brain_core::memory_service::MemoryService> = match config.memory_provider {
        MemoryProvider::None => Arc::new(StubMemoryService::new(clock, idle)),
        MemoryProvider::Graph => Arc::new(GraphMemoryService::new(clock, idle)),
        MemoryProvider::Semantic => {
            let base_url = std::env::var("MEMORY_BASE_URL").unwrap_or_else(|_| "https://api.example.com".to_string());
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("API_KEY is required when MEMORY_PROVIDER=semantic"))?;
            Arc::new(CloudMemoryService::new(base_url, api_key, clock, idle, config.tool_timeout)?)
        }
    };

    let storage = Arc::new(SqlStorageService::new(Arc::new(InMemorySqlExecutor::default())));
    let embedder = Arc::new(FallbackEmbedder::new(Box::new(HashEmbedder::default()), None));
    let reranker = Arc::new(PassthroughReranker);

    Ok(create_deps_with_fleet(memory, storage, config, embedder, reranker))
}
