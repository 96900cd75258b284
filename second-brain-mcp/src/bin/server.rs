//! Second Brain MCP server binary. Communicates over stdio using JSON-RPC,
//! one request per line (or LSP `Content-Length` framed).

use second_brain_agents::embedding::{FallbackEmbedder, HashEmbedder, PassthroughReranker};
use second_brain_agents::{create_deps_with_fleet, Deps};
use second_brain_core::clock::SystemClock;
use second_brain_core::config::{Config, MemoryProvider};
use second_brain_mcp::jsonrpc::{read_next_message, write_response, JsonRpcRequest, JsonRpcResponse};
use second_brain_mcp::{dispatch, health};
use second_brain_memory::{CloudMemoryService, GraphMemoryService, StubMemoryService};
use second_brain_storage::{InMemorySqlExecutor, SqlStorageService};
use std::io::{self, BufReader};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

fn build_deps(config: Config) -> anyhow::Result<Deps> {
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let deps = match Config::from_env().and_then(|c| build_deps(c).map_err(|e| second_brain_core::Error::Configuration(e.to_string()))) {
        Ok(deps) => deps,
        Err(e) => {
            error!(event = "mcp.init_failed", error = %e);
            println!("{}", serde_json::json!({ "status": "error", "message": health::INIT_FAILURE_MESSAGE }));
            std::process::exit(1);
        }
    };

    info!(event = "mcp.started");

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    while let Some(line) = read_next_message(&mut reader)? {
        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => dispatch(request, &deps).await,
            Err(e) => JsonRpcResponse::err(None, -32700, format!("parse error: {e}")),
        };
        write_response(&mut writer, &response)?;
    }

    Ok(())
}
