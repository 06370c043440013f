//! Configuration management

use std::net::SocketAddr;
use std::path::Path;

use clap::ValueEnum;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind network transports to
    pub host: String,
    /// Port for network transports (0 picks an ephemeral port)
    pub port: u16,
    /// Transport binding to serve
    pub transport: TransportMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            transport: TransportMode::Stdio,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (text, json)
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: None,
        }
    }
}

/// Transport binding selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// HTTP with JSON request/response framing
    Http,
    /// HTTP with SSE event framing of responses
    Sse,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
            Self::Sse => write!(f, "sse"),
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file and `MCP_MOCK_`
    /// environment variables, on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed("MCP_MOCK_").split("__"));

        figment.extract().map_err(|e| Error::Config(e.to_string()))
    }

    /// Socket address for the network transports.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .server
            .host
            .parse()
            .map_err(|e| Error::Config(format!("Invalid host '{}': {e}", self.server.host)))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_stdio_on_8001() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.transport, TransportMode::Stdio);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/mock.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "server:\n  host: 0.0.0.0\n  port: 9100\n  transport: sse\nlogging:\n  level: debug"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.transport, TransportMode::Sse);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_yaml_keeps_defaults_elsewhere() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "server:\n  port: 0").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 0);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.transport, TransportMode::Stdio);
    }

    #[test]
    fn bind_addr_rejects_bad_host() {
        let mut config = Config::default();
        config.server.host = "not-an-ip".to_string();
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8001");
    }

    #[test]
    fn transport_mode_display() {
        assert_eq!(TransportMode::Stdio.to_string(), "stdio");
        assert_eq!(TransportMode::Http.to_string(), "http");
        assert_eq!(TransportMode::Sse.to_string(), "sse");
    }
}
