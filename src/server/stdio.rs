//! Stdio transport binding.
//!
//! Newline-delimited JSON-RPC over stdin/stdout, one long-lived process per
//! test run (the harness owns the process lifecycle). Logging goes to
//! stderr, so stdout carries nothing but protocol frames.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::McpHandler;
use crate::error::Result;
use crate::protocol::JsonRpcResponse;

/// Serve the handler over the process stdin/stdout until EOF.
pub async fn serve_stdio(handler: McpHandler) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    debug!("Stdio transport ready");
    run_loop(reader, writer, &handler).await
}

/// The message loop, generic over its streams so tests can drive it with
/// in-memory duplex pipes.
pub(crate) async fn run_loop<R, W>(mut reader: R, mut writer: W, handler: &McpHandler) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).await?;
        if bytes == 0 {
            debug!("Stdio closed, shutting down");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(trimmed) {
            Ok(request) => handler.handle(&request),
            Err(e) => {
                warn!(error = %e, "Discarding unparseable stdio frame");
                Some(JsonRpcResponse::error(
                    None,
                    -32700,
                    format!("Invalid JSON: {e}"),
                ))
            }
        };

        // Notifications produce no frame at all.
        if let Some(response) = response {
            let payload = serde_json::to_string(&response)?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }
}
