//! Maps an incoming JSON-RPC method to either the health check, the
//! pipeline executor, or a single agent call, applying the MCP/REST
//! boundary's error mapping (§7): `InvalidInput → 400`, `Timeout → 408`,
//! everything else → a generic code with full detail logged server-side.

use crate::health;
use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use second_brain_agents::pipeline::{run_pipeline, PipelineStep, StepOutcome};
use second_brain_agents::tool::call_tool;
use second_brain_agents::Deps;
use second_brain_core::error::ErrorKind;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct PipelineParams {
    steps: Vec<PipelineStepParams>,
}

#[derive(Deserialize)]
struct PipelineStepParams {
    agent: String,
    input: Value,
}

fn kind_to_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidInput => 400,
        ErrorKind::Timeout => 408,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::Unavailable => 503,
    }
}

pub async fn dispatch(request: JsonRpcRequest, deps: &Deps) -> JsonRpcResponse {
    let id = request.id;
    let params = request.params.unwrap_or(Value::Null);

    match request.method.as_str() {
        "health" => JsonRpcResponse::ok(id, health::check(Some(deps)).await),
        "pipeline" => match serde_json::from_value::<PipelineParams>(params) {
            Ok(parsed) => {
                let steps = parsed.steps.into_iter().map(|s| PipelineStep::new(s.agent, s.input)).collect();
                let outcomes = run_pipeline(steps, deps).await;
                let rendered: serde_json::Map<String, Value> = outcomes
                    .into_iter()
                    .map(|(name, outcome)| {
                        let value = match outcome {
                            StepOutcome::Ok(v) => serde_json::json!({ "ok": v }),
                            StepOutcome::Err { kind } => serde_json::json!({ "error": format!("{kind} failed") }),
                        };
                        (name, value)
                    })
                    .collect();
                JsonRpcResponse::ok(id, Value::Object(rendered))
            }
            Err(e) => JsonRpcResponse::err(id, 400, format!("invalid pipeline params: {e}")),
        },
        agent_name => {
            let Some(agent) = deps.registry.get(agent_name) else {
                return JsonRpcResponse::err(id, -32601, format!("unknown method '{agent_name}'"));
            };
            match call_tool(agent_name, || agent.run(params, deps)).await {
                Ok(value) => JsonRpcResponse::ok(id, value),
                Err(tool_error) => {
                    tracing::error!(event = "mcp.dispatch.failed", agent = agent_name, error = %tool_error);
                    JsonRpcResponse {
                        jsonrpc: "2.0".to_string(),
                        id,
                        result: None,
                        error: Some(JsonRpcError {
                            code: kind_to_code(tool_error.kind),
                            message: tool_error.to_string(),
                            data: None,
                        }),
                    }
                }
            }
        }
    }
}
