//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::handlers::{GetAllUsersHandler, GetUserByIdHandler, SearchPapersHandler};
use super::jsonplaceholder::JsonPlaceholderClient;
use crate::tools::SearchPapersTool;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "get_all_users")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for MCP tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tools proxying the JSONPlaceholder users API
    pub fn jsonplaceholder(client: JsonPlaceholderClient) -> Self {
        let mut registry = Self::new();

        registry.register(Tool {
            name: "get_all_users".to_string(),
            description: "Get all users from the JSONPlaceholder API, optionally filtered. \
                          Returns an empty list if the API cannot be reached."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "integer",
                        "description": "ID of the user to retrieve. If omitted, retrieves all users."
                    },
                    "name": {
                        "type": "string",
                        "description": "Name of the user to filter by"
                    },
                    "username": {
                        "type": "string",
                        "description": "Username of the user to filter by"
                    },
                    "email": {
                        "type": "string",
                        "description": "Email of the user to filter by"
                    }
                }
            }),
            handler: Arc::new(GetAllUsersHandler {
                client: client.clone(),
            }),
        });

        registry.register(Tool {
            name: "get_user_by_id".to_string(),
            description: "Get a user by ID from the JSONPlaceholder API.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "integer",
                        "description": "ID of the user to retrieve"
                    }
                },
                "required": ["user_id"]
            }),
            handler: Arc::new(GetUserByIdHandler { client }),
        });

        registry
    }

    /// The arXiv paper search tool
    pub fn papers(search: SearchPapersTool) -> Self {
        let mut registry = Self::new();

        registry.register(Tool {
            name: SearchPapersTool::NAME.to_string(),
            description: SearchPapersTool::DESCRIPTION.to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query for academic papers"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 3
                    },
                    "is_latest": {
                        "type": "boolean",
                        "description": "Whether to restrict results to the latest papers",
                        "default": true
                    },
                    "start_time": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Start of the submission date window (RFC 3339)"
                    },
                    "end_time": {
                        "type": "string",
                        "format": "date-time",
                        "description": "End of the submission date window (RFC 3339)"
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchPapersHandler { search }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools, ordered by name
    pub fn all(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}
