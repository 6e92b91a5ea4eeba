//! # joplin-mcp
//!
//! Model Context Protocol adapter for the Joplin notes app.
//!
//! Exposes a JSON-RPC 2.0 endpoint whose `tools/call` requests are
//! translated one-to-one into calls against Joplin's local REST API
//! (the Web Clipper service).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use joplin_mcp::{BackendClient, BridgeConfig, ToolExecutor};
//! use serde_json::json;
//!
//! # async fn demo() -> joplin_mcp::Result<()> {
//! let config = BridgeConfig::default();
//! let executor = ToolExecutor::new(BackendClient::new(&config)?);
//!
//! // Raw JSON from GET /folders
//! let folders = executor.execute("list_folders", &json!({})).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod mcp;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use backend::{BackendClient, BackendRequest, HttpMethod};
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use health::BackendStatus;
pub use mcp::{McpServer, ToolCall, ToolExecutor, ToolName, ToolRegistry};
