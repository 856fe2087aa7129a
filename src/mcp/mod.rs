//! MCP (Model Context Protocol) tool servers.

mod handlers;
pub mod jsonplaceholder;
pub mod server;
mod tools;

pub use jsonplaceholder::{JsonPlaceholderClient, PlaceholderError, UserFilter};
pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
