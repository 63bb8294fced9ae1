//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! every layer of the server, so startup failures surface through a single
//! `Result` regardless of where they originate.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::tools::DiscoveryError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Tool module discovery failed during startup.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Error raised by the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_discovery_failure_converts() {
        let err: Error = DiscoveryError::ModuleFailed {
            module: "tools::math".to_string(),
            source: ToolError::duplicate("add"),
        }
        .into();
        assert!(matches!(err, Error::Discovery(_)));
        assert!(err.to_string().starts_with("Discovery error:"));
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::config("bad mode");
        assert_eq!(err.to_string(), "Configuration error: bad mode");
    }
}
