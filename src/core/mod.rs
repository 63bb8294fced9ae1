//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the server handler, and the transports.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::{Config, DiscoveryMode, ToolsConfig};
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
