//! Tool handlers.

use serde::Deserialize;
use serde_json::Value;

use super::jsonplaceholder::{JsonPlaceholderClient, UserFilter};
use super::tools::ToolHandler;
use crate::tools::{SearchPapersInput, SearchPapersTool};

fn parse_args<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, String> {
    // Clients may omit the arguments object entirely.
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Handler for listing users; any upstream failure yields an empty list
#[derive(Debug)]
pub struct GetAllUsersHandler {
    pub client: JsonPlaceholderClient,
}

#[async_trait::async_trait]
impl ToolHandler for GetAllUsersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let filter: UserFilter = parse_args(args)?;

        match self.client.list_users(&filter).await {
            Ok(users) => Ok(Value::Array(users)),
            Err(e) => {
                tracing::error!(error = %e, "get_all_users failed, returning empty list");
                Ok(Value::Array(Vec::new()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetUserByIdArgs {
    user_id: u64,
}

/// Handler for fetching one user
#[derive(Debug)]
pub struct GetUserByIdHandler {
    pub client: JsonPlaceholderClient,
}

#[async_trait::async_trait]
impl ToolHandler for GetUserByIdHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let GetUserByIdArgs { user_id } = parse_args(args)?;

        self.client
            .get_user(user_id)
            .await
            .map_err(|e| format!("Failed to get user {}: {}", user_id, e))
    }
}

/// Handler for the paper search pipeline
#[derive(Debug)]
pub struct SearchPapersHandler {
    pub search: SearchPapersTool,
}

#[async_trait::async_trait]
impl ToolHandler for SearchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let input: SearchPapersInput = parse_args(args)?;
        if input.query.trim().is_empty() {
            return Err("Missing 'query' parameter".to_string());
        }

        let documents = self
            .search
            .invoke_concurrent(&input)
            .await
            .map_err(|e| e.to_string())?;

        serde_json::to_value(documents).map_err(|e| e.to_string())
    }
}
