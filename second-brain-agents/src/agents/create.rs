//! The `create` agent: ingests a categorized entry into a whitelisted
//! storage table (§4.2).

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::domain::CategorizedEntry;
use second_brain_core::error::{Error, Result};
use second_brain_core::storage_service::SearchableTable;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct CreateInput {
    table: String,
    content: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

pub struct CreateAgent;

#[async_trait]
impl Agent for CreateAgent {
    fn name(&self) -> &'static str {
        "create"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: CreateInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let table = SearchableTable::parse(&request.table)?;
        let entry = CategorizedEntry::new(deps.config.user_id.clone(), request.content, request.category, request.tags);
        let id = deps.storage.insert_entry(table, entry).await?;
        Ok(serde_json::json!({ "id": id }))
    }
}
