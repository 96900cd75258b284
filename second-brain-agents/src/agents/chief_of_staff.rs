//! The `chief_of_staff` agent: the only agent permitted to route to other
//! agents, and it does so exclusively through the registry (§4.4).

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{sanitize, Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RouteStep {
    agent: String,
    input: Value,
}

#[derive(Deserialize)]
struct ChiefOfStaffInput {
    steps: Vec<RouteStep>,
}

pub struct ChiefOfStaffAgent;

#[async_trait]
impl Agent for ChiefOfStaffAgent {
    fn name(&self) -> &'static str {
        "chief_of_staff"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: ChiefOfStaffInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let mut outcomes = serde_json::Map::new();
        for step in request.steps {
            if step.agent == self.name() {
                return Err(Error::InvalidInput("chief_of_staff cannot route to itself".to_string()));
            }
            let handle = deps
                .registry
                .get(&step.agent)
                .ok_or_else(|| Error::NotFound(format!("agent '{}'", step.agent)))?;
            let outcome = match handle.run(step.input, deps).await {
                Ok(value) => serde_json::json!({ "ok": value }),
                Err(e) => {
                    tracing::warn!(event = "chief_of_staff.step_failed", agent = %step.agent, error = %sanitize(&e));
                    serde_json::json!({ "error": sanitize(&e) })
                }
            };
            outcomes.insert(step.agent, outcome);
        }
        Ok(Value::Object(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::test_deps;
    use crate::registry::AgentRegistry;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct EchoAgent;
    #[async_trait]
    impl Agent for EchoAgent {
        fn name(&self) -> &'static str {
            "echo"
        }
        async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
            Ok(input)
        }
    }

    fn deps_with_echo() -> Deps {
        let mut deps = test_deps();
        let mut agents: HashMap<&'static str, crate::registry::AgentHandle> = HashMap::new();
        agents.insert("echo", Arc::new(EchoAgent));
        deps.registry = AgentRegistry::new(agents);
        deps
    }

    #[tokio::test]
    async fn routes_each_step_through_the_registry() {
        let deps = deps_with_echo();
        let output = ChiefOfStaffAgent
            .run(serde_json::json!({"steps": [{"agent": "echo", "input": {"x": 1}}]}), &deps)
            .await
            .unwrap();
        assert_eq!(output["echo"]["ok"]["x"], 1);
    }

    #[tokio::test]
    async fn unknown_agent_name_is_not_found() {
        let deps = deps_with_echo();
        let result = ChiefOfStaffAgent
            .run(serde_json::json!({"steps": [{"agent": "ghost", "input": {}}]}), &deps)
            .await;
        assert!(result.is_err());
    }
}
