//! The health endpoint contract (§7): never leaks the real construction
//! failure to the caller, only to the logs.

use second_brain_agents::Deps;
use serde_json::{json, Value};

pub const INIT_FAILURE_MESSAGE: &str = "Initialization failed. Check server logs.";

/// Build `Deps`, logging the real failure cause at `error!` and returning
/// the fixed neutral message to the caller on any construction failure.
pub async fn check(deps: Option<&Deps>) -> Value {
    match deps {
        Some(deps) => {
            let memory_ok = deps.memory.health_check().await;
            json!({ "status": if memory_ok { "ok" } else { "degraded" }, "memory_provider_ok": memory_ok })
        }
        None => {
            tracing::error!(event = "mcp.health.init_failed");
            json!({ "status": "error", "message": INIT_FAILURE_MESSAGE })
        }
    }
}
