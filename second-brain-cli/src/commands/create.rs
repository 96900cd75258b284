use clap::Args;
use second_brain_agents::{registry::Agent, Deps};

#[derive(Args)]
pub struct CreateArgs {
    /// One of patterns, examples, knowledge, experiences.
    pub table: String,
    pub content: String,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

pub async fn run(args: CreateArgs, deps: &Deps) -> anyhow::Result<()> {
    let Some(agent) = deps.registry.get("create") else {
        anyhow::bail!("create agent is not registered");
    };
    let input = serde_json::json!({
        "table": args.table,
        "content": args.content,
        "category": args.category,
        "tags": args.tags,
    });
    let output = agent.run(input, deps).await?;
    super::print_json(&output);
    Ok(())
}
