//! Error types for the mock MCP server

use std::io;

use thiserror::Error;

/// Result type alias for the mock server
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level errors (startup and transport plumbing).
///
/// Per-call failures never land here: a malformed directive or an exhausted
/// response queue is reported back to the caller as a structured body, not
/// propagated as a server error.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
