//! The fixed agent fleet (§5): a frozen name → handle table built once at
//! `Deps` construction and never mutated afterward. Routing between agents
//! goes exclusively through the registry, never direct function calls.

use crate::deps::Deps;
use async_trait::async_trait;
use second_brain_core::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value>;
}

pub type AgentHandle = Arc<dyn Agent>;

/// The fixed set of names every registry must carry (§5.1).
pub const AGENT_NAMES: [&str; 13] = [
    "recall",
    "learn",
    "create",
    "review",
    "chief_of_staff",
    "coach",
    "pmo",
    "clarity",
    "synthesizer",
    "specialist",
    "email",
    "template_builder",
    "hook_writer",
];

pub struct AgentRegistry {
    agents: HashMap<&'static str, AgentHandle>,
}

impl AgentRegistry {
    #[must_use]
    pub fn new(agents: HashMap<&'static str, AgentHandle>) -> Self {
        Self { agents }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<AgentHandle> {
        self.agents.get(name).cloned()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.agents.keys().copied().collect()
    }
}

/// Build the fixed 13-agent fleet (§5.1). Called once by `create_deps`.
#[must_use]
pub fn default_fleet() -> AgentRegistry {
    use crate::agents::*;
    let mut agents: HashMap<&'static str, AgentHandle> = HashMap::new();
    agents.insert("recall", Arc::new(RecallAgent));
    agents.insert("learn", Arc::new(LearnAgent));
    agents.insert("create", Arc::new(CreateAgent));
    agents.insert("review", Arc::new(ReviewAgent));
    agents.insert("chief_of_staff", Arc::new(ChiefOfStaffAgent));
    agents.insert("coach", Arc::new(CoachAgent));
    agents.insert("pmo", Arc::new(PmoAgent));
    agents.insert("clarity", Arc::new(ClarityAgent));
    agents.insert("synthesizer", Arc::new(SynthesizerAgent));
    agents.insert("specialist", Arc::new(SpecialistAgent));
    agents.insert("email", Arc::new(EmailAgent));
    agents.insert("template_builder", Arc::new(TemplateBuilderAgent));
    agents.insert("hook_writer", Arc::new(HookWriterAgent));
    AgentRegistry::new(agents)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn default_fleet_covers_every_fixed_agent_name() {
        let registry = default_fleet();
        for name in AGENT_NAMES {
            assert!(registry.get(name).is_some(), "missing agent: {name}");
        }
    }

    #[test]
    fn lookup_returns_registered_agent() {
        let mut agents: HashMap<&'static str, AgentHandle> = HashMap::new();
        agents.insert("echo", Arc::new(EchoAgent));
        let registry = AgentRegistry::new(agents);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
    }
}
