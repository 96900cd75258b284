use clap::Args;
use second_brain_agents::Deps;

#[derive(Args)]
pub struct RecallArgs {
    /// The query text to search for.
    pub query: String,

    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Force the broad parallel-gather path instead of complexity routing.
    #[arg(long)]
    pub deep: bool,

    /// Free-text steering instruction passed to the reranker.
    #[arg(long)]
    pub instruction: Option<String>,
}

pub async fn run(args: RecallArgs, deps: &Deps) -> anyhow::Result<()> {
    let matches = if args.deep {
        second_brain_agents::recall_deep(deps, &args.query, args.limit, args.instruction.as_deref()).await?
    } else {
        second_brain_agents::quick_recall(deps, &args.query, args.limit).await?
    };
    super::print_json(&serde_json::json!({ "matches": matches }));
    Ok(())
}
