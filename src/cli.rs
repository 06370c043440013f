//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, TransportMode};

/// Directive-driven mock MCP server for deterministic integration testing
#[derive(Parser, Debug)]
#[command(name = "mcp-mock-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "MCP_MOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Transport binding to serve
    #[arg(short, long, env = "MCP_MOCK_TRANSPORT")]
    pub transport: Option<TransportMode>,

    /// Port for the network transports
    #[arg(short, long, env = "MCP_MOCK_PORT")]
    pub port: Option<u16>,

    /// Host to bind network transports to
    #[arg(long, env = "MCP_MOCK_HOST")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_MOCK_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "MCP_MOCK_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: defaults, then config file and
    /// environment, then explicit flags.
    pub fn resolve_config(&self) -> crate::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host.clone_from(host);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_stdio_with_no_flags() {
        let cli = Cli::parse_from(["mcp-mock-server"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.server.transport, TransportMode::Stdio);
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "mcp-mock-server",
            "--transport",
            "http",
            "--port",
            "0",
            "--host",
            "0.0.0.0",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.server.transport, TransportMode::Http);
        assert_eq!(config.server.port, 0);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn sse_transport_parses() {
        let cli = Cli::parse_from(["mcp-mock-server", "-t", "sse"]);
        assert_eq!(cli.transport, Some(TransportMode::Sse));
    }
}
