//! The tool-error envelope (§4.4, §7): every tool callable an agent can
//! invoke is wrapped so failures surface as a stable `{tool, kind}` shape
//! rather than a raw error string.

use second_brain_core::error::{Error, ErrorKind};
use serde::Serialize;
use std::future::Future;

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub tool: String,
    pub kind: ErrorKind,
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tool, self.kind)
    }
}

impl ToolError {
    /// The wire shape callers see: `{"error": "<tool>: <kind>"}`.
    #[must_use]
    pub fn to_envelope(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Call `tool_name`'s underlying operation, converting any error into a
/// `ToolError` instead of letting the raw message escape.
pub async fn call_tool<F, Fut, T>(tool_name: &str, operation: F) -> Result<T, ToolError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    operation().await.map_err(|e| ToolError {
        tool: tool_name.to_string(),
        kind: e.kind(),
    })
}
