mod commands;
mod deps_builder;

use clap::{Parser, Subcommand};
use commands::content_type::ContentTypeCommand;
use commands::{content_type, create, health, learn, pipeline, recall, review};
use second_brain_core::config::Config;

#[derive(Parser)]
#[command(name = "second-brain", about = "Persistent memory and retrieval for AI assistants")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recall matching memories for a query.
    Recall(recall::RecallArgs),
    /// Record a learned pattern.
    Learn(learn::LearnArgs),
    /// Create a categorized entry in a searchable table.
    Create(create::CreateArgs),
    /// Score and record a project review artifact.
    Review(review::ReviewArgs),
    /// Run an ordered list of agent steps as a pipeline.
    Pipeline(pipeline::PipelineArgs),
    /// Manage content type configuration.
    ContentType {
        #[command(subcommand)]
        command: ContentTypeCommand,
    },
    /// Report service health.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let deps = deps_builder::build_deps(config)?;

    match cli.command {
        Command::Recall(args) => recall::run(args, &deps).await,
        Command::Learn(args) => learn::run(args, &deps).await,
        Command::Create(args) => create::run(args, &deps).await,
        Command::Review(args) => review::run(args, &deps).await,
        Command::Pipeline(args) => pipeline::run(args, &deps).await,
        Command::ContentType { command } => content_type::run(command, &deps).await,
        Command::Health => health::run(&deps).await,
    }
}
