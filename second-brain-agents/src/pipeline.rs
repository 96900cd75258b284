//! `run_pipeline` (§4.4, §9 REDESIGN FLAG): executes an ordered list of
//! `(agent_name, input)` steps sequentially through the registry, returning
//! a stable name → outcome map. Errors are sanitized before they ever leave
//! this function — no raw exception string crosses the pipeline boundary.

use crate::deps::Deps;
use second_brain_core::error::{sanitize, Error, ErrorKind};
use serde_json::Value;
use std::collections::HashMap;

/// One step: the agent to invoke and the input to hand it.
pub struct PipelineStep {
    pub agent_name: String,
    pub input: Value,
}

impl PipelineStep {
    #[must_use]
    pub fn new(agent_name: impl Into<String>, input: Value) -> Self {
        Self { agent_name: agent_name.into(), input }
    }
}

#[derive(Debug, Clone)]
pub enum StepOutcome {
    Ok(Value),
    Err { kind: ErrorKind },
}

/// Run each step in order, looking up its agent in `deps.registry` fresh
/// per step (steps may depend on state earlier steps wrote). A missing
/// agent name or a caller-side error is captured per step, never aborting
/// the remaining steps (§4.4).
pub async fn run_pipeline(steps: Vec<PipelineStep>, deps: &Deps) -> HashMap<String, StepOutcome> {
    let mut results = HashMap::with_capacity(steps.len());
    for step in steps {
        let outcome = match deps.registry.get(&step.agent_name) {
            Some(agent) => match agent.run(step.input, deps).await {
                Ok(value) => StepOutcome::Ok(value),
                Err(e) => {
                    tracing::warn!(event = "pipeline.step_failed", agent = %step.agent_name, error = %sanitize(&e));
                    StepOutcome::Err { kind: e.kind() }
                }
            },
            None => {
                let e = Error::NotFound(format!("agent '{}'", step.agent_name));
                tracing::warn!(event = "pipeline.step_failed", agent = %step.agent_name, error = %sanitize(&e));
                StepOutcome::Err { kind: e.kind() }
            }
        };
        results.insert(step.agent_name, outcome);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::test_deps;
    use crate::registry::AgentRegistry;
    use crate::registry::{Agent, AgentHandle};
    use async_trait::async_trait;
    use second_brain_core::error::Result;
    use std::sync::Arc;

    struct AlwaysFails;
    #[async_trait]
    impl Agent for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }
        async fn run(&self, _input: Value, _deps: &Deps) -> Result<Value> {
            Err(Error::Unavailable("downstream provider is down with secret token abc123".to_string()))
        }
    }

    struct Echo;
    #[async_trait]
    impl Agent for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }
        async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
            Ok(input)
        }
    }

    fn deps_with(agents: Vec<AgentHandle>) -> Deps {
        let mut deps = test_deps();
        let mut map: HashMap<&'static str, AgentHandle> = HashMap::new();
        for agent in agents {
            let leaked_name: &'static str = Box::leak(agent.name().to_string().into_boxed_str());
            map.insert(leaked_name, agent);
        }
        deps.registry = AgentRegistry::new(map);
        deps
    }

    #[tokio::test]
    async fn runs_every_step_and_collects_all_keys() {
        let deps = deps_with(vec![Arc::new(Echo)]);
        let results = run_pipeline(vec![PipelineStep::new("echo", serde_json::json!({"a": 1}))], &deps).await;
        assert!(matches!(results["echo"], StepOutcome::Ok(_)));
    }

    #[tokio::test]
    async fn sanitizes_error_strings_before_returning() {
        let deps = deps_with(vec![Arc::new(AlwaysFails)]);
        let results = run_pipeline(vec![PipelineStep::new("always_fails", serde_json::json!({}))], &deps).await;
        match &results["always_fails"] {
            StepOutcome::Err { kind } => assert_eq!(*kind, ErrorKind::Unavailable),
            StepOutcome::Ok(_) => panic!("expected an error outcome"),
        }
    }

    #[tokio::test]
    async fn missing_agent_yields_not_found_without_aborting_other_steps() {
        let deps = deps_with(vec![Arc::new(Echo)]);
        let results = run_pipeline(
            vec![
                PipelineStep::new("ghost", serde_json::json!({})),
                PipelineStep::new("echo", serde_json::json!({"ok": true})),
            ],
            &deps,
        )
        .await;
        assert!(matches!(results["ghost"], StepOutcome::Err { .. }));
        assert!(matches!(results["echo"], StepOutcome::Ok(_)));
    }
}
