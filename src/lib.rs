//! Tool MCP Server Library
//!
//! A small Model Context Protocol (MCP) server exposing tools that are
//! discovered at startup from tool modules.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool modules, the module catalog, discovery and the registry
//!
//! # Example
//!
//! ```rust,no_run
//! use tool_mcp_server::{Config, McpServer};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config)?;
//!     println!("{} tools registered", server.tool_count());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
