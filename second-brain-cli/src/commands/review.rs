use clap::Args;
use second_brain_agents::{registry::Agent, Deps};
use uuid::Uuid;

#[derive(Args)]
pub struct ReviewArgs {
    pub project_id: Uuid,
    pub content: String,
}

pub async fn run(args: ReviewArgs, deps: &Deps) -> anyhow::Result<()> {
    let Some(agent) = deps.registry.get("review") else {
        anyhow::bail!("review agent is not registered");
    };
    let input = serde_json::json!({ "project_id": args.project_id, "content": args.content });
    let output = agent.run(input, deps).await?;
    super::print_json(&output);
    Ok(())
}
