//! Client for the JSONPlaceholder users API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::HttpClient;

/// Errors from the JSONPlaceholder API
#[derive(Debug, thiserror::Error)]
pub enum PlaceholderError {
    #[error("Request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Optional filters for listing users, sent as query parameters when set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// ID of the user to retrieve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Name of the user to filter by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Username of the user to filter by
    #[serde(default, alias = "user_name", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email of the user to filter by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct JsonPlaceholderClient {
    client: HttpClient,
    base_url: String,
}

impl JsonPlaceholderClient {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `GET /users`, filtered
    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<Value>, PlaceholderError> {
        let url = format!("{}/users", self.base_url);
        tracing::debug!(url = %url, filter = ?filter, "Listing users");

        let mut request = self.client.get(&url);
        if !filter.is_empty() {
            request = request.query(filter);
        }

        let body = Self::send(request).await?;
        match body {
            Value::Array(users) => Ok(users),
            other => Err(PlaceholderError::Decode(format!(
                "expected a list of users, got {}",
                other
            ))),
        }
    }

    /// `GET /users/{id}`
    pub async fn get_user(&self, id: u64) -> Result<Value, PlaceholderError> {
        let url = format!("{}/users/{}", self.base_url, id);
        tracing::debug!(url = %url, "Fetching user");
        Self::send(self.client.get(&url)).await
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<Value, PlaceholderError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlaceholderError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| PlaceholderError::Decode(e.to_string()))
    }
}
