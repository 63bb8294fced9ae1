//! Arithmetic tools.
//!
//! Registers `add` and `multiply`, both operating on 64-bit signed integers.
//! Overflow is reported back to the client as a tool error.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::tools::{ToolError, ToolOutput, ToolRegistry};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Two integer operands.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BinaryOperands {
    /// First operand.
    pub a: i64,

    /// Second operand.
    pub b: i64,
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Add tool - adds two integers.
pub struct AddTool;

impl AddTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add two integers.";

    #[instrument(skip_all, fields(a = params.a, b = params.b))]
    pub fn execute(params: &BinaryOperands) -> Result<i64, ToolError> {
        info!("Add tool called");
        params.a.checked_add(params.b).ok_or_else(|| {
            ToolError::execution_failed(format!(
                "Integer overflow adding {} and {}",
                params.a, params.b
            ))
        })
    }
}

/// Multiply tool - multiplies two integers.
pub struct MultiplyTool;

impl MultiplyTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "multiply";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Multiply two integers.";

    #[instrument(skip_all, fields(a = params.a, b = params.b))]
    pub fn execute(params: &BinaryOperands) -> Result<i64, ToolError> {
        info!("Multiply tool called");
        params.a.checked_mul(params.b).ok_or_else(|| {
            ToolError::execution_failed(format!(
                "Integer overflow multiplying {} and {}",
                params.a, params.b
            ))
        })
    }
}

/// Register the arithmetic tools.
pub fn register(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register_fn(AddTool::NAME, AddTool::DESCRIPTION, |params: BinaryOperands| {
        AddTool::execute(&params).map(ToolOutput::new)
    })?;
    registry.register_fn(
        MultiplyTool::NAME,
        MultiplyTool::DESCRIPTION,
        |params: BinaryOperands| MultiplyTool::execute(&params).map(ToolOutput::new),
    )
}

// ============================================================================
// Tests
// ============================================================================
