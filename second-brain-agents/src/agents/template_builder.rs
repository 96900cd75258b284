//! The `template_builder` agent: renders content against a registered
//! content type's writing instructions (§4.2 content-type registry).

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Deserialize)]
struct TemplateBuilderInput {
    content_type: String,
    fields: HashMap<String, String>,
}

pub struct TemplateBuilderAgent;

#[async_trait]
impl Agent for TemplateBuilderAgent {
    fn name(&self) -> &'static str {
        "template_builder"
    }

    async fn run(&self, input: Value, deps: &Deps) -> Result<Value> {
        let request: TemplateBuilderInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let types = deps.storage.list_content_types().await?;
        let config = types
            .into_iter()
            .find(|t| t.slug == request.content_type)
            .ok_or_else(|| Error::NotFound(format!("content type '{}'", request.content_type)))?;

        let mut body = config.writing_instructions.clone();
        let mut keys: Vec<&String> = request.fields.keys().collect();
        keys.sort();
        for key in keys {
            let placeholder = format!("{{{{{key}}}}}");
            body = body.replace(&placeholder, &request.fields[key]);
        }
        Ok(serde_json::json!({
            "content_type": config.slug,
            "length_guidance": config.length_guidance,
            "content": body,
        }))
    }
}
