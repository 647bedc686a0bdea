//! Manifest discovery.
//!
//! Some clients post `{"type":"discover","payload":{"requestManifest":true}}`
//! before (or instead of) opening a session. The answer is built from the
//! registry and does not depend on any session.

use serde::Serialize;
use serde_json::Value;

use super::protocol::PromptDefinition;
use super::registry::McpRegistry;

pub const DISCOVER_TYPE: &str = "discover";
pub const DISCOVER_RESPONSE_TYPE: &str = "discover_response";

/// True when `body` is a discovery request.
pub fn is_discovery_request(body: &Value) -> bool {
    body.get("type").and_then(Value::as_str) == Some(DISCOVER_TYPE)
        && body
            .get("payload")
            .and_then(|payload| payload.get("requestManifest"))
            .is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestTool {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub tools: Vec<ManifestTool>,
    pub resources: Vec<Value>,
    pub prompts: Vec<PromptDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestPayload {
    pub manifest: Manifest,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub payload: ManifestPayload,
}

pub fn discover_response(registry: &McpRegistry) -> DiscoverResponse {
    let tools = registry
        .tools()
        .map(|tool| ManifestTool {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.input_schema.clone(),
        })
        .collect();

    DiscoverResponse {
        kind: DISCOVER_RESPONSE_TYPE,
        payload: ManifestPayload {
            manifest: Manifest {
                tools,
                resources: Vec::new(),
                prompts: registry.prompt_definitions(),
            },
        },
    }
}
