use second_brain_agents::Deps;
use second_brain_core::memory_service::MemoryService as _;

pub async fn run(deps: &Deps) -> anyhow::Result<()> {
    let ok = deps.memory.health_check().await;
    super::print_json(&serde_json::json!({ "status": if ok { "ok" } else { "degraded" } }));
    Ok(())
}
