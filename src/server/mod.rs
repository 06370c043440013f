//! Server-side JSON-RPC dispatch shared by every transport binding.
//!
//! Each binding (stdio loop, HTTP router) feeds parsed JSON values into one
//! [`McpHandler`]; the handler owns no transport concerns and the bindings
//! own no protocol logic.

mod router;
mod stdio;

pub use router::{AppState, create_router, serve_http};
pub use stdio::serve_stdio;

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::protocol::{
    Content, Info, InitializeResult, JsonRpcResponse, PROTOCOL_VERSION, RequestId,
    ServerCapabilities, ToolsCallParams, ToolsCallResult, ToolsCapability, ToolsListResult,
};
use crate::registry::ResponseRegistry;
use crate::tool::{is_scripted_tool, serve_scripted_response, tool_definitions};

/// Instructions string advertised at initialize
const SERVER_INSTRUCTIONS: &str = "A mock server for testing MCP tool integrations.";

/// MCP request dispatcher backed by the shared response registry.
#[derive(Clone)]
pub struct McpHandler {
    /// Scripted response queues, shared across transports
    registry: Arc<ResponseRegistry>,
}

impl McpHandler {
    /// Create a handler over a registry
    #[must_use]
    pub fn new(registry: Arc<ResponseRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatch one JSON-RPC message.
    ///
    /// Returns `None` for notifications (no response expected). Malformed
    /// requests yield JSON-RPC error responses, never a panic or a dropped
    /// connection.
    #[must_use]
    pub fn handle(&self, request: &Value) -> Option<JsonRpcResponse> {
        let (id, method, params) = match parse_request(request) {
            Ok(parsed) => parsed,
            Err(response) => return Some(response),
        };

        if is_notification_method(&method) {
            debug!(notification = %method, "Acknowledged notification");
            return None;
        }

        // parse_request guarantees an id for non-notification requests
        let id = id?;

        debug!(method = %method, request_id = %id, "MCP request");

        let response = match method.as_str() {
            "initialize" => handle_initialize(id),
            "tools/list" => handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            _ => JsonRpcResponse::error(Some(id), -32601, format!("Method not found: {method}")),
        };

        Some(response)
    }

    /// Handle `tools/call`: route the named tool to the scripted-response
    /// handler.
    fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolsCallParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(call)) => call,
            Ok(None) => {
                return JsonRpcResponse::error(Some(id), -32602, "Missing tool call params");
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    Some(id),
                    -32602,
                    format!("Invalid tool call params: {e}"),
                );
            }
        };

        if !is_scripted_tool(&call.name) {
            return JsonRpcResponse::error(
                Some(id),
                -32601,
                format!("Unknown tool: {}", call.name),
            );
        }

        let Some(task_description) = call
            .arguments
            .get("task_description")
            .and_then(Value::as_str)
        else {
            return JsonRpcResponse::error(
                Some(id),
                -32602,
                "Missing required argument: task_description",
            );
        };

        let body = serve_scripted_response(&self.registry, task_description);
        let result = ToolsCallResult {
            content: vec![Content::Text {
                text: body.to_string(),
            }],
            structured_content: Some(body),
            is_error: false,
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                JsonRpcResponse::error(Some(id), -32603, format!("Serialization failed: {e}"))
            }
        }
    }
}

/// Handle `initialize`
fn handle_initialize(id: RequestId) -> JsonRpcResponse {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
        },
        server_info: Info {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: Some(SERVER_INSTRUCTIONS.to_string()),
    };

    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(Some(id), -32603, format!("Serialization failed: {e}")),
    }
}

/// Handle `tools/list`
fn handle_tools_list(id: RequestId) -> JsonRpcResponse {
    let result = ToolsListResult {
        tools: tool_definitions(),
    };

    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(Some(id), -32603, format!("Serialization failed: {e}")),
    }
}

/// Extract a `RequestId` from a JSON value.
///
/// Supports string and integer ID values per JSON-RPC 2.0.
fn extract_request_id(value: &Value) -> Option<RequestId> {
    match value {
        Value::String(s) => Some(RequestId::String(s.clone())),
        Value::Number(n) => n.as_i64().map(RequestId::Number),
        _ => None,
    }
}

/// Check whether a method name represents a notification (no response
/// expected).
fn is_notification_method(method: &str) -> bool {
    method.starts_with("notifications/")
}

/// Parse a JSON-RPC request or notification.
///
/// Returns `(Option<RequestId>, method, params)`; the id is `None` only for
/// notifications.
#[allow(clippy::result_large_err)] // JsonRpcResponse doubles as the error body
fn parse_request(
    value: &Value,
) -> Result<(Option<RequestId>, String, Option<Value>), JsonRpcResponse> {
    let jsonrpc = value.get("jsonrpc").and_then(|v| v.as_str());
    if jsonrpc != Some("2.0") {
        return Err(JsonRpcResponse::error(
            None,
            -32600,
            "Invalid JSON-RPC version",
        ));
    }

    let id = value.get("id").and_then(extract_request_id);

    let method = value
        .get("method")
        .and_then(|v| v.as_str())
        .ok_or_else(|| JsonRpcResponse::error(id.clone(), -32600, "Missing method"))?;

    let params = value.get("params").cloned();

    if !is_notification_method(method) && id.is_none() {
        return Err(JsonRpcResponse::error(None, -32600, "Missing id"));
    }

    Ok((id, method.to_string(), params))
}
