//! Tools domain module.
//!
//! Tools are executable functions that MCP clients call by name.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool modules, one file each, plus the module catalog
//! - `discovery.rs` - Directory scan and module loader
//! - `registry.rs` - Tool registry, dispatch and rmcp router construction
//! - `output.rs` - Structured output helpers
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, `execute()`, and `register()`
//! 3. Declare it in `definitions/mod.rs` and add it to `catalog()`
//!
//! No change to `server.rs` or the transports is needed.

pub mod definitions;
pub mod discovery;
mod error;
mod output;
mod registry;

pub use discovery::{
    DiscoveryError, LoadReport, ModuleCatalog, RegisterFn, ToolLoader, load_tools, scan_modules,
};
pub use error::ToolError;
pub use output::{ToolOutput, error_result, structured_result};
pub use registry::{RegisteredTool, ToolHandlerFn, ToolRegistry};
