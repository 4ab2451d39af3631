//! Tool trait and registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::protocol::{CallToolResult, ToolSchema};

/// Error raised before a tool gets to run.
///
/// Failures of the operation itself are reported inside the
/// [`CallToolResult`] (with `isError` set), not through this type.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The arguments do not match the tool's input schema
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Tool executor trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError>;
}

/// Tool registry for managing available tools
///
/// Tools are listed in name order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str, minimum: i64) -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": description,
        "minimum": minimum
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.0.to_string(),
                description: "echo".to_string(),
                input_schema: json_schema_object(
                    serde_json::json!({"text": json_schema_string("text to echo")}),
                    &["text"],
                ),
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
            Ok(CallToolResult::text(arguments.to_string()))
        }
    }

    #[test]
    fn registry_lists_in_name_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("zeta")));
        registry.register(Arc::new(Echo("alpha")));

        let names: Vec<String> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("beta").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn schema_helpers() {
        let schema = json_schema_object(
            serde_json::json!({"page": json_schema_integer("page", 1)}),
            &[],
        );
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["page"]["minimum"], 1);
        assert_eq!(schema["required"], serde_json::json!([]));
    }
}
