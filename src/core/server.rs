//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler. Construction runs tool
//! discovery: the registry is filled once, then frozen and shared by every
//! transport connection.
//!
//! **Adding a new tool does NOT require modifying this file!** See
//! `domains/tools/definitions/`.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{ModuleCatalog, ToolRegistry, definitions, load_tools};

const INSTRUCTIONS: &str =
    "This server exposes arithmetic tools (add, multiply) and a weather forecast tool.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. It is cheap to
/// clone; clones share the same tool registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools, read-only once discovery has finished.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server, discovering the built-in tool modules.
    ///
    /// The modules are catalogued under the configured namespace. Fails if
    /// any discovered tool module fails to load.
    pub fn new(config: Config) -> crate::Result<Self> {
        let catalog = definitions::catalog_in(&config.tools.namespace);
        Self::with_catalog(config, catalog)
    }

    /// Create a new MCP server resolving discovered modules in `catalog`.
    pub fn with_catalog(config: Config, catalog: ModuleCatalog) -> crate::Result<Self> {
        let registry = load_tools(&config.tools, catalog)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a new MCP server around an already populated registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        info!("Serving {} tool(s): {:?}", registry.len(), registry.tool_names());

        Self {
            tool_router: registry.build_router::<Self>(),
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// Server instructions advertised on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .list_tools()
            .into_iter()
            .map(|t| {
                let mut tool = serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                });
                if let (Some(schema), Some(obj)) = (t.output_schema, tool.as_object_mut()) {
                    obj.insert("outputSchema".to_string(), serde_json::json!(schema));
                }
                tool
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let result = self
            .registry
            .call_tool(name, arguments)
            .map_err(|e| e.to_string())?;

        serde_json::to_value(result).map_err(|e| e.to_string())
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
