//! MCP (Model Context Protocol) server module.
//!
//! Provides a JSON-RPC 2.0 over HTTP interface that exposes the notes
//! backend to AI agents as a fixed set of tools.

pub mod executor;
pub mod params;
pub mod server;
pub mod tools;
pub mod types;

pub use executor::ToolExecutor;
pub use params::{ToolCall, ToolName};
pub use server::McpServer;
pub use tools::ToolRegistry;
