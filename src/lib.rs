//! Mock MCP Server Library
//!
//! A directive-driven mock Model Context Protocol (MCP) server for
//! deterministic integration testing of agent systems.
//!
//! # How it works
//!
//! Test cases script the server per call through directives embedded in the
//! tool's free-text argument: `[test_case_id=...]` names the scenario and
//! `[mcp_responses_json=...]` carries a base64-encoded JSON array of
//! responses, decoded once and served strictly FIFO. Every served response
//! has its keys rewritten from snake_case to camelCase to mimic the wire
//! convention of the real endpoint.
//!
//! # Transports
//!
//! - **stdio**: newline-delimited JSON-RPC over stdin/stdout
//! - **http**: JSON-RPC over `POST /mcp` with JSON responses
//! - **sse**: same endpoint with SSE event framing of responses
//!
//! All transports share one response registry, plus an unauthenticated
//! `GET /health` readiness probe on the network bindings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod normalize;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tool;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging.
///
/// Logs go to stderr so the stdio transport keeps stdout clean for protocol
/// frames.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
