use clap::Args;
use second_brain_agents::{Deps, PipelineStep, StepOutcome};

#[derive(Args)]
pub struct PipelineArgs {
    /// A JSON array of `{"agent": "...", "input": {...}}` steps.
    pub steps: String,
}

#[derive(serde::Deserialize)]
struct StepSpec {
    agent: String,
    input: serde_json::Value,
}

pub async fn run(args: PipelineArgs, deps: &Deps) -> anyhow::Result<()> {
    let specs: Vec<StepSpec> = serde_json::from_str(&args.steps)?;
    let steps = specs.into_iter().map(|s| PipelineStep::new(s.agent, s.input)).collect();
    let outcomes = second_brain_agents::run_pipeline(steps, deps).await;

    let rendered: serde_json::Map<String, serde_json::Value> = outcomes
        .into_iter()
        .map(|(name, outcome)| {
            let value = match outcome {
                StepOutcome::Ok(v) => serde_json::json!({ "ok": v }),
                StepOutcome::Err { kind } => serde_json::json!({ "error": kind.to_string() }),
            };
            (name, value)
        })
        .collect();

    super::print_json(&serde_json::Value::Object(rendered));
    Ok(())
}
