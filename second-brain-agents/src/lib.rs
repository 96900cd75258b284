//! Agent dispatch, pipelines, and the recall orchestration layer: the
//! fixed agent fleet, the tool-call/output-validation retry envelopes, the
//! shared `Deps` container, and `quick_recall`/`recall_deep`.

pub mod agents;
pub mod deps;
pub mod embed_cache;
pub mod embedding;
pub mod pipeline;
pub mod recall;
pub mod registry;
pub mod retry_request;
pub mod tool;

pub use deps::{create_deps, create_deps_with_fleet, Deps};
pub use pipeline::{run_pipeline, PipelineStep, StepOutcome};
pub use recall::{quick_recall, recall_deep};
pub use registry::{default_fleet, Agent, AgentHandle, AgentRegistry};
