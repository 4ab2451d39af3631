//! MCP tool server.
//!
//! Exposes `search_trains` and `find_station` to assistants over the Model
//! Context Protocol: JSON-RPC 2.0, one message per line on stdin/stdout.

pub mod protocol;
mod registry;
mod server;
mod tools;

pub use registry::{
    Tool, ToolError, ToolRegistry, json_schema_integer, json_schema_object, json_schema_string,
};
pub use server::{McpServer, ServerError};
pub use tools::{FindStationTool, SearchTrainsTool};
