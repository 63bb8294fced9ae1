//! Transport layer for the MCP server.
//!
//! - **HTTP**: stateless JSON-RPC over POST with JSON responses - feature: `http` (default)
//! - **STDIO**: standard input/output - feature: `stdio` (default)
//!
//! Each transport handles the connection lifecycle and delegates message
//! processing to the MCP server handler.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
