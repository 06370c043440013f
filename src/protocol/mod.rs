//! MCP protocol types (the subset this mock serves)

mod messages;
mod types;

pub use messages::*;
pub use types::*;

/// MCP protocol version advertised at initialize
pub const PROTOCOL_VERSION: &str = "2024-11-05";
