//! Tool Registry - central registration and dispatch for all tools.
//!
//! Tool modules register into a [`ToolRegistry`] during startup. Once
//! discovery is finished the registry is frozen behind an `Arc` and serves:
//! - tool metadata for listing
//! - direct dispatch of tool calls (HTTP transport)
//! - the rmcp `ToolRouter` used by the STDIO transport
//!
//! Duplicate tool names are rejected.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter, cached_schema_for_type},
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::error::ToolError;
use super::output::{error_result, structured_result};

/// Type-erased tool handler.
pub type ToolHandlerFn =
    Arc<dyn Fn(JsonObject) -> Result<CallToolResult, ToolError> + Send + Sync>;

/// A tool together with its handler.
#[derive(Clone)]
pub struct RegisteredTool {
    tool: Tool,
    handler: ToolHandlerFn,
}

impl RegisteredTool {
    /// Tool metadata as advertised to clients.
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Invoke the handler with raw JSON arguments.
    pub fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        (self.handler)(arguments)
    }
}

/// Tool registry - owns every registered tool for the lifetime of the process.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
    loaded_modules: BTreeSet<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .field("loaded_modules", &self.loaded_modules)
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with a raw handler.
    ///
    /// Fails with [`ToolError::Duplicate`] when the name is already taken;
    /// the existing registration is left untouched.
    pub fn register(&mut self, tool: Tool, handler: ToolHandlerFn) -> Result<(), ToolError> {
        let name = tool.name.to_string();
        if name.trim().is_empty() {
            return Err(ToolError::invalid_arguments("tool name cannot be empty"));
        }
        if self.tools.contains_key(&name) {
            warn!("Rejected duplicate tool registration: {}", name);
            return Err(ToolError::duplicate(name));
        }

        debug!("Registered tool: {}", name);
        self.tools.insert(name, RegisteredTool { tool, handler });
        Ok(())
    }

    /// Register a typed tool function.
    ///
    /// The input schema is derived from `P` and the output schema from `R`.
    /// Arguments that do not deserialize into `P` are reported as
    /// [`ToolError::InvalidArguments`]; an [`ToolError::ExecutionFailed`]
    /// returned by `f` becomes an error `CallToolResult` so the client sees
    /// the message as tool output.
    pub fn register_fn<P, R, F>(
        &mut self,
        name: &'static str,
        description: &'static str,
        f: F,
    ) -> Result<(), ToolError>
    where
        P: DeserializeOwned + JsonSchema + 'static,
        R: Serialize + JsonSchema + 'static,
        F: Fn(P) -> Result<R, ToolError> + Send + Sync + 'static,
    {
        let tool = Tool {
            name: name.into(),
            description: Some(description.into()),
            input_schema: cached_schema_for_type::<P>(),
            annotations: None,
            output_schema: Some(cached_schema_for_type::<R>()),
            icons: None,
            meta: None,
            title: None,
        };

        let handler = move |arguments: JsonObject| -> Result<CallToolResult, ToolError> {
            let params: P = serde_json::from_value(serde_json::Value::Object(arguments))
                .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
            match f(params) {
                Ok(output) => Ok(structured_result(&output)),
                Err(ToolError::ExecutionFailed(msg)) => Ok(error_result(&msg)),
                Err(e) => Err(e),
            }
        };

        self.register(tool, Arc::new(handler))
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool has been registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Whether a tool with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Look up a registered tool.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// All tool names, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// All tools as Tool models (metadata), sorted by name.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.values().map(|t| t.tool().clone()).collect()
    }

    /// Dispatch a tool call by name.
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let entry = self.get(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::not_found(name)
        })?;

        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {}",
                    other
                )));
            }
        };

        entry.call(arguments)
    }

    /// Record that a tool module has been loaded.
    ///
    /// Returns `false` if it was already loaded into this registry.
    pub fn mark_loaded(&mut self, module: &str) -> bool {
        self.loaded_modules.insert(module.to_string())
    }

    /// Whether a tool module has already been loaded.
    pub fn is_loaded(&self, module: &str) -> bool {
        self.loaded_modules.contains(module)
    }

    /// Qualified names of the loaded tool modules, sorted.
    pub fn loaded_modules(&self) -> Vec<&str> {
        self.loaded_modules.iter().map(String::as_str).collect()
    }

    /// Build the rmcp ToolRouter for the STDIO transport.
    pub fn build_router<S>(&self) -> ToolRouter<S>
    where
        S: Send + Sync + 'static,
    {
        self.tools
            .values()
            .fold(ToolRouter::new(), |router, entry| {
                let handler = entry.handler.clone();
                router.with_route(ToolRoute::new_dyn(
                    entry.tool.clone(),
                    move |ctx: ToolCallContext<'_, S>| {
                        let args = ctx.arguments.clone().unwrap_or_default();
                        let handler = handler.clone();
                        async move { handler(args).map_err(McpError::from) }.boxed()
                    },
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolOutput;
    use rmcp::model::RawContent;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        message: String,
    }

    fn echo_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn("echo", "Echo a message", |p: EchoParams| {
                Ok(ToolOutput::new(p.message))
            })
            .unwrap();
        registry
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_register_and_call() {
        let registry = echo_registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("echo"));

        let result = registry
            .call_tool("echo", serde_json::json!({ "message": "hi" }))
            .unwrap();
        assert_eq!(text_of(&result), "hi");
        assert_eq!(
            result.structured_content,
            Some(serde_json::json!({ "result": "hi" }))
        );
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = echo_registry();
        let err = registry
            .register_fn("echo", "Another echo", |p: EchoParams| {
                Ok(ToolOutput::new(format!("{}!", p.message)))
            })
            .unwrap_err();
        assert!(matches!(err, ToolError::Duplicate(ref name) if name == "echo"));

        // First registration wins and is unchanged.
        let result = registry
            .call_tool("echo", serde_json::json!({ "message": "hi" }))
            .unwrap();
        assert_eq!(text_of(&result), "hi");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_call_unknown() {
        let registry = echo_registry();
        let err = registry.call_tool("unknown", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[test]
    fn test_call_invalid_arguments() {
        let registry = echo_registry();
        let err = registry
            .call_tool("echo", serde_json::json!({ "msg": "typo" }))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = registry
            .call_tool("echo", serde_json::json!(["not", "an", "object"]))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_execution_failure_becomes_error_result() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn("fail", "Always fails", |_: EchoParams| -> Result<ToolOutput<i64>, ToolError> {
                Err(ToolError::execution_failed("nope"))
            })
            .unwrap();

        let result = registry
            .call_tool("fail", serde_json::json!({ "message": "x" }))
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "nope");
    }

    #[test]
    fn test_tool_metadata_has_schemas() {
        let registry = echo_registry();
        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);

        let tool = &tools[0];
        assert_eq!(tool.name, "echo");
        assert_eq!(tool.description.as_deref(), Some("Echo a message"));
        assert!(tool.input_schema.get("properties").is_some());
        let output = tool.output_schema.as_ref().unwrap();
        assert!(output["properties"].get("result").is_some());
    }

    #[test]
    fn test_tool_names_are_sorted() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register_fn(name, "test", |p: EchoParams| Ok(ToolOutput::new(p.message)))
                .unwrap();
        }
        assert_eq!(registry.tool_names(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_mark_loaded_once() {
        let mut registry = ToolRegistry::new();
        assert!(registry.mark_loaded("tools::math"));
        assert!(!registry.mark_loaded("tools::math"));
        assert!(registry.is_loaded("tools::math"));
        assert_eq!(registry.loaded_modules(), vec!["tools::math"]);
    }

    #[test]
    fn test_build_router_matches_registry() {
        struct TestServer {}

        let registry = echo_registry();
        let router: ToolRouter<TestServer> = registry.build_router();
        let tools = router.list_all();
        assert_eq!(tools.len(), registry.len());
        assert_eq!(tools[0].name, "echo");
    }
}
