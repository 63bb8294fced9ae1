//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Tool discovery configuration.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Where the tool loader looks for tool modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Scan a directory for tool module sources and load the ones found.
    ///
    /// A missing directory loads nothing.
    Directory { path: PathBuf },

    /// Load every module compiled into the catalog, without scanning.
    Catalog,
}

/// Configuration for tool discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Discovery source.
    pub discovery: DiscoveryMode,

    /// Namespace prefix discovered module names are resolved under.
    pub namespace: String,
}

/// Directory holding the tool module sources of this crate.
pub fn default_discovery_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("domains")
        .join("tools")
        .join("definitions")
}

/// Namespace the built-in tool modules are catalogued under.
pub const DEFAULT_TOOLS_NAMESPACE: &str = "tools";

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryMode::Directory {
                path: default_discovery_dir(),
            },
            namespace: DEFAULT_TOOLS_NAMESPACE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "tool-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_TOOLS_DIR`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.tools = ToolsConfig::from_env()?;

        Ok(config)
    }
}

impl ToolsConfig {
    /// Load tool discovery settings from environment variables.
    ///
    /// `MCP_TOOLS_DISCOVERY` selects the mode (`directory` or `catalog`),
    /// `MCP_TOOLS_DIR` overrides the scanned directory and
    /// `MCP_TOOLS_NAMESPACE` the namespace prefix.
    pub fn from_env() -> Result<Self> {
        let mut tools = Self::default();

        let mode = std::env::var("MCP_TOOLS_DISCOVERY")
            .unwrap_or_default()
            .to_lowercase();

        match mode.as_str() {
            "" | "directory" => {
                if let Ok(dir) = std::env::var("MCP_TOOLS_DIR") {
                    tools.discovery = DiscoveryMode::Directory {
                        path: PathBuf::from(dir),
                    };
                }
            }
            "catalog" => tools.discovery = DiscoveryMode::Catalog,
            other => {
                return Err(Error::config(format!(
                    "unknown MCP_TOOLS_DISCOVERY mode '{}' (expected 'directory' or 'catalog')",
                    other
                )));
            }
        }

        if let Ok(namespace) = std::env::var("MCP_TOOLS_NAMESPACE") {
            tools.namespace = namespace;
        }

        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_tools_env() {
        unsafe {
            std::env::remove_var("MCP_TOOLS_DISCOVERY");
            std::env::remove_var("MCP_TOOLS_DIR");
            std::env::remove_var("MCP_TOOLS_NAMESPACE");
        }
    }

    #[test]
    fn test_default_discovers_source_directory() {
        let config = Config::default();
        assert_eq!(
            config.tools.discovery,
            DiscoveryMode::Directory {
                path: default_discovery_dir()
            }
        );
        assert_eq!(config.tools.namespace, "tools");
        assert!(default_discovery_dir().ends_with("src/domains/tools/definitions"));
    }

    #[test]
    fn test_tools_dir_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_tools_env();
        unsafe {
            std::env::set_var("MCP_TOOLS_DIR", "/opt/tools");
            std::env::set_var("MCP_TOOLS_NAMESPACE", "plugins");
        }
        let tools = ToolsConfig::from_env().unwrap();
        assert_eq!(
            tools.discovery,
            DiscoveryMode::Directory {
                path: PathBuf::from("/opt/tools")
            }
        );
        assert_eq!(tools.namespace, "plugins");
        clear_tools_env();
    }

    #[test]
    fn test_catalog_mode_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_tools_env();
        unsafe {
            std::env::set_var("MCP_TOOLS_DISCOVERY", "Catalog");
        }
        let tools = ToolsConfig::from_env().unwrap();
        assert_eq!(tools.discovery, DiscoveryMode::Catalog);
        clear_tools_env();
    }

    #[test]
    fn test_unknown_discovery_mode_is_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_tools_env();
        unsafe {
            std::env::set_var("MCP_TOOLS_DISCOVERY", "recursive");
        }
        let err = ToolsConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("recursive"));
        clear_tools_env();
    }

    #[test]
    fn test_discovery_mode_serde_shape() {
        let json = serde_json::to_value(DiscoveryMode::Catalog).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "catalog" }));

        let parsed: DiscoveryMode =
            serde_json::from_value(serde_json::json!({ "mode": "directory", "path": "/x" }))
                .unwrap();
        assert_eq!(
            parsed,
            DiscoveryMode::Directory {
                path: PathBuf::from("/x")
            }
        );
    }
}
