//! The `pmo` agent: project-management surface over the storage service's
//! project CRUD (§3 Project model, §4.2).

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::domain::{LifecycleStage, Project};
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum PmoInput {
    Create { title: String, description: String },
    Advance { project_id: Uuid, stage: LifecycleStage },
    List,
}

pub struct PmoAgent;

#[async_trait]
impl Agent for PmoAgent {
    fn name(&self) -> &'static str {
        "pmo"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: PmoInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        match request {
            PmoInput::Create { title, description } => {
                let project = deps.storage.create_project(Project::new(deps.config.user_id.clone(), title, description)).await?;
                Ok(serde_json::json!({ "project": project }))
            }
            PmoInput::Advance { project_id, stage } => {
                let project = deps.storage.advance_project(project_id, stage).await?;
                Ok(serde_json::json!({ "project": project }))
            }
            PmoInput::List => {
                let projects = deps.storage.list_projects(&deps.config.user_id).await?;
                Ok(serde_json::json!({ "projects": projects }))
            }
        }
    }
}
