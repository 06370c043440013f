//! The scripted-response tool: directive extraction, queue resolution, and
//! key normalization composed into one call handler.
//!
//! The same handler is registered under two tool names so test fixtures can
//! address the stdio and HTTP variants independently while sharing all
//! server-side state.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::directive::Directive;
use crate::normalize::normalize_keys;
use crate::protocol::Tool;
use crate::registry::ResponseRegistry;

/// Tool name exposed for the stdio transport variant
pub const TOOL_NAME_STDIO: &str = "get_data_stdio";

/// Tool name exposed for the HTTP transport variant
pub const TOOL_NAME_HTTP: &str = "get_data_http";

/// Both registrations of the one scripted-response handler.
#[must_use]
pub fn tool_definitions() -> Vec<Tool> {
    [TOOL_NAME_STDIO, TOOL_NAME_HTTP]
        .into_iter()
        .map(|name| Tool {
            name: name.to_string(),
            description: Some(
                "Returns the next pre-configured response for the test case named \
                 by directives embedded in task_description."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "task_description": {
                        "type": "string",
                        "description": "Free text carrying [test_case_id=...] and \
                                        optionally [mcp_responses_json=...] directives"
                    }
                },
                "required": ["task_description"]
            }),
        })
        .collect()
}

/// Whether `name` is one of the two registered tool names.
#[must_use]
pub fn is_scripted_tool(name: &str) -> bool {
    name == TOOL_NAME_STDIO || name == TOOL_NAME_HTTP
}

/// Serve the next scripted response for the directives in `task_description`.
///
/// Total over its inputs: every failure mode degrades to a structured
/// `{"error": ...}` body so callers distinguish success from failure by key
/// presence, never by transport status. The registry lock is released before
/// normalization.
#[must_use]
pub fn serve_scripted_response(registry: &Arc<ResponseRegistry>, task_description: &str) -> Value {
    let directive = match Directive::extract(task_description) {
        Ok(directive) => directive,
        Err(e) => {
            warn!(error = %e, "Directive extraction failed");
            return json!({"error": e.to_string()});
        }
    };

    let popped = match registry.resolve_and_pop(
        &directive.test_case_id,
        directive.responses_payload.as_deref(),
    ) {
        Ok(value) => value,
        Err(e) => {
            warn!(case_id = %directive.test_case_id, error = %e, "Serve failed");
            return json!({"error": e.to_string()});
        }
    };

    debug!(case_id = %directive.test_case_id, "Serving scripted response");
    normalize_keys(popped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use pretty_assertions::assert_eq;

    fn directive_text(case_id: &str, responses: &Value) -> String {
        format!(
            "do the task [test_case_id={case_id}][mcp_responses_json={}]",
            BASE64.encode(responses.to_string())
        )
    }

    #[test]
    fn both_tool_names_advertised() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["get_data_stdio", "get_data_http"]);
        assert!(is_scripted_tool("get_data_stdio"));
        assert!(is_scripted_tool("get_data_http"));
        assert!(!is_scripted_tool("get_data"));
    }

    #[test]
    fn schema_requires_task_description() {
        let tools = tool_definitions();
        for tool in tools {
            assert_eq!(tool.input_schema["required"][0], "task_description");
        }
    }

    #[test]
    fn serves_normalized_response() {
        let registry = Arc::new(ResponseRegistry::new());
        let text = directive_text("norm", &json!([{"image_data": {"mime_type": "image/png"}}]));

        let body = serve_scripted_response(&registry, &text);
        assert_eq!(body, json!({"imageData": {"mimeType": "image/png"}}));
    }

    #[test]
    fn missing_id_returns_error_body() {
        let registry = Arc::new(ResponseRegistry::new());
        let body = serve_scripted_response(&registry, "no directives at all");
        assert_eq!(
            body["error"],
            "Directive [test_case_id=...] not found in task_description."
        );
    }

    #[test]
    fn serve_errors_become_error_bodies() {
        let registry = Arc::new(ResponseRegistry::new());

        let body = serve_scripted_response(&registry, "[test_case_id=fresh]");
        assert_eq!(
            body["error"],
            "Directive [mcp_responses_json=...] not found for new test case."
        );

        let text = directive_text("fresh", &json!(["only"]));
        assert_eq!(serve_scripted_response(&registry, &text), json!("only"));

        let body = serve_scripted_response(&registry, &text);
        assert_eq!(
            body["error"],
            "No more responses available for test case 'fresh'."
        );
    }

    #[test]
    fn queue_is_shared_between_tool_variants() {
        // One registry backs both tool names; the handler does not care
        // which name routed the call.
        let registry = Arc::new(ResponseRegistry::new());
        let text = directive_text("shared", &json!(["first", "second"]));

        assert_eq!(serve_scripted_response(&registry, &text), json!("first"));
        assert_eq!(serve_scripted_response(&registry, &text), json!("second"));
    }

    #[test]
    fn queue_entries_stay_unnormalized_until_served() {
        let registry = Arc::new(ResponseRegistry::new());
        let text = directive_text("lazily", &json!([{"snake_key": 1}, {"snake_key": 2}]));

        assert_eq!(
            serve_scripted_response(&registry, &text),
            json!({"snakeKey": 1})
        );
        // Second entry is normalized independently at its own serve time.
        assert_eq!(
            serve_scripted_response(&registry, &text),
            json!({"snakeKey": 2})
        );
    }
}
