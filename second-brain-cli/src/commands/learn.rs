use clap::Args;
use second_brain_agents::{registry::Agent, Deps};

#[derive(Args)]
pub struct LearnArgs {
    pub topic: String,
    pub content: String,

    /// Comma-separated keywords.
    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,
}

pub async fn run(args: LearnArgs, deps: &Deps) -> anyhow::Result<()> {
    let Some(agent) = deps.registry.get("learn") else {
        anyhow::bail!("learn agent is not registered");
    };
    let input = serde_json::json!({ "topic": args.topic, "content": args.content, "keywords": args.keywords });
    let output = agent.run(input, deps).await?;
    super::print_json(&output);
    Ok(())
}
