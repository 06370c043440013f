//! HTTP router and handlers for the network binding.
//!
//! One POST endpoint carries JSON-RPC tool traffic; responses are plain JSON
//! in `http` mode or framed as a single SSE event in `sse` mode. A separate
//! unauthenticated `GET /health` probe lets the test harness poll for
//! readiness before driving calls.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response, Sse, sse::Event},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, info};

use super::McpHandler;
use crate::error::{Error, Result};

/// Shared application state
pub struct AppState {
    /// The transport-agnostic request dispatcher
    pub handler: McpHandler,
    /// Frame POST responses as SSE events instead of JSON bodies
    pub sse_framing: bool,
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/mcp", post(mcp_handler))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve the network transport until shutdown.
pub async fn serve_http(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let app = create_router(Arc::clone(&state));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Transport(format!("Failed to bind {addr}: {e}")))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| Error::Transport(e.to_string()))?;

    let framing = if state.sse_framing { "sse" } else { "json" };
    info!(addr = %local_addr, framing = framing, "Mock MCP server listening");
    info!("  POST http://{local_addr}/mcp  (tool calls)");
    info!("  GET  http://{local_addr}/health  (readiness probe)");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Transport(format!("HTTP server failed: {e}")))
}

/// Health check handler.
///
/// Fixed body, no auth, no parameters; the harness polls this until the
/// process is ready.
async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// POST /mcp handler: parse one JSON-RPC message and dispatch it.
async fn mcp_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "jsonrpc": "2.0",
                    "error": {"code": -32700, "message": format!("Invalid JSON: {e}")},
                    "id": null
                })),
            )
                .into_response();
        }
    };

    let Some(response) = state.handler.handle(&request) else {
        // Notification: acknowledge with 202 and no body
        debug!("Notification accepted");
        return (StatusCode::ACCEPTED, Json(json!({}))).into_response();
    };

    let payload = match serde_json::to_value(&response) {
        Ok(value) => value,
        Err(e) => json!({
            "jsonrpc": "2.0",
            "error": {"code": -32603, "message": format!("Serialization failed: {e}")},
            "id": null
        }),
    };

    if state.sse_framing {
        sse_response(&payload)
    } else {
        (StatusCode::OK, Json(payload)).into_response()
    }
}

/// Frame a single JSON-RPC response as an SSE stream with one event.
fn sse_response(payload: &Value) -> Response {
    let (tx, rx) = tokio::sync::mpsc::channel::<std::result::Result<Event, Infallible>>(1);
    // The channel has capacity for the one event; a failed send only means
    // the client already went away.
    let _ = tx.try_send(Ok(Event::default().data(payload.to_string())));
    Sse::new(ReceiverStream::new(rx)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::registry::ResponseRegistry;

    fn state(sse_framing: bool) -> Arc<AppState> {
        Arc::new(AppState {
            handler: McpHandler::new(Arc::new(ResponseRegistry::new())),
            sse_framing,
        })
    }

    #[tokio::test]
    async fn health_body_is_fixed() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn invalid_json_yields_parse_error_body() {
        let response = mcp_handler(State(state(false)), Bytes::from_static(b"{nope")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn notification_returns_accepted() {
        let body = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        let response =
            mcp_handler(State(state(false)), Bytes::from(body.to_string())).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn json_framing_returns_rpc_response() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
        let response =
            mcp_handler(State(state(false)), Bytes::from(body.to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["result"], json!({}));
    }

    #[tokio::test]
    async fn sse_framing_wraps_response_in_event_stream() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
        let response = mcp_handler(State(state(true)), Bytes::from(body.to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/event-stream"));

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let frame = String::from_utf8(bytes.to_vec()).unwrap();
        let data = frame
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap();
        let value: Value = serde_json::from_str(data).unwrap();
        assert_eq!(value["result"], json!({}));
    }
}
