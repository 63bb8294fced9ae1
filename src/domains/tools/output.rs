//! Tool output helpers.
//!
//! Every tool returns its value wrapped as `{"result": ...}` structured
//! content, with the value also rendered as plain text for clients that do
//! not read structured output.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Structured output wrapper shared by all tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolOutput<T> {
    /// The value produced by the tool.
    pub result: T,
}

impl<T> ToolOutput<T> {
    /// Wrap a tool's return value.
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// Build a successful result carrying `output` as structured content.
pub fn structured_result<T: Serialize>(output: &T) -> CallToolResult {
    match serde_json::to_value(output) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(render_text(&structured))],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            error_result(&format!("Failed to serialize tool output: {}", e))
        }
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Text rendering of a structured output: bare strings stay unquoted.
fn render_text(structured: &Value) -> String {
    match structured.get("result") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => structured.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_structured_result_number() {
        let result = structured_result(&ToolOutput::new(42_i64));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            result.structured_content,
            Some(serde_json::json!({ "result": 42 }))
        );
        assert_eq!(text_of(&result), "42");
    }

    #[test]
    fn test_structured_result_string_is_unquoted() {
        let result = structured_result(&ToolOutput::new("sunny".to_string()));
        assert_eq!(text_of(&result), "sunny");
    }

    #[test]
    fn test_error_result() {
        let result = error_result("boom");
        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
        assert_eq!(text_of(&result), "boom");
    }
}
