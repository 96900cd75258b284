//! The `email` agent: formats a message envelope. No network send — that
//! integration is out of scope (§2 Non-goals); it only produces the text a
//! caller would hand to a mail transport.

use crate::deps::Deps;
use crate::registry::Agent;
use async_trait::async_trait;
use second_brain_core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct EmailInput {
    to: String,
    subject: String,
    body: String,
}

pub struct EmailAgent;

#[async_trait]
impl Agent for EmailAgent {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn run(&self, input: Value, _deps: &Deps) -> Result<Value> {
        let request: EmailInput = serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        if request.to.trim().is_empty() || !request.to.contains('@') {
            return Err(Error::InvalidInput("to must be a valid-looking address".to_string()));
        }
        let formatted = format!("To: {}\nSubject: {}\n\n{}", request.to, request.subject, request.body);
        Ok(serde_json::json!({ "to": request.to, "subject": request.subject, "formatted": formatted }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::test_deps;

    #[tokio::test]
    async fn formats_a_message_envelope() {
        let deps = test_deps();
        let output = EmailAgent
            .run(serde_json::json!({"to": "a@example.com", "subject": "Status", "body": "All green."}), &deps)
            .await
            .unwrap();
        assert!(output["formatted"].as_str().unwrap().starts_with("To: a@example.com"));
    }

    #[tokio::test]
    async fn rejects_an_address_without_an_at_sign() {
        let deps = test_deps();
        let result = EmailAgent
            .run(serde_json::json!({"to": "not-an-email", "subject": "x", "body": "y"}), &deps)
            .await;
        assert!(result.is_err());
    }
}
