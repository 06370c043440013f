//! Mock MCP Server - directive-driven response player for integration tests

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use mcp_mock_server::{
    cli::Cli,
    config::TransportMode,
    registry::ResponseRegistry,
    server::{AppState, McpHandler, serve_http, serve_stdio},
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // One registry for the process lifetime; restarting is the only reset.
    let registry = Arc::new(ResponseRegistry::new());
    let handler = McpHandler::new(registry);

    let outcome = match config.server.transport {
        TransportMode::Stdio => {
            info!("Serving stdio transport");
            serve_stdio(handler).await
        }
        TransportMode::Http | TransportMode::Sse => {
            let addr = match config.bind_addr() {
                Ok(addr) => addr,
                Err(e) => {
                    error!(error = %e, "Invalid bind address");
                    return ExitCode::FAILURE;
                }
            };
            let state = Arc::new(AppState {
                handler,
                sse_framing: config.server.transport == TransportMode::Sse,
            });
            serve_http(addr, state).await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
