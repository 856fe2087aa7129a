//! Hosted LLM providers behind a single chat interface.
//!
//! Providers are selected from [`LlmSettings`]; construction fails with a
//! [`ConfigError`] when required credentials are missing, so misconfiguration
//! surfaces before any workflow runs.

mod auth;
pub mod mock;
mod openai;
pub mod parser;
mod vertex;

pub use auth::{ServiceAccountKey, TokenSource};
pub use mock::MockChatModel;
pub use openai::OpenAiModel;
pub use vertex::VertexModel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{ConfigError, LlmProvider, LlmSettings};
use crate::utils::HttpClient;

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Requested output encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Ask the provider to emit a JSON object
    Json,
}

/// A chat completion request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn json(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A chat completion response
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Errors from LLM providers
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Provider returned no content")]
    EmptyResponse,
}

/// A model that answers chat requests
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Provider and model name, for logs
    fn name(&self) -> String;

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Build the configured chat model
pub fn build_chat_model(
    settings: &LlmSettings,
    client: HttpClient,
) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let model: Arc<dyn ChatModel> = match settings.provider {
        LlmProvider::Vertex => Arc::new(VertexModel::from_settings(settings, client)?),
        LlmProvider::OpenAi => Arc::new(OpenAiModel::from_settings(settings, client)?),
    };
    tracing::debug!(model = %model.name(), "Chat model configured");
    Ok(model)
}

/// Read a non-success response into an [`LlmError::Status`]
async fn status_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    LlmError::Status { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpSettings;

    #[test]
    fn test_missing_vertex_settings_is_config_error() {
        let settings = LlmSettings {
            provider: LlmProvider::Vertex,
            google_application_credentials: None,
            google_cloud_project: None,
            ..LlmSettings::default()
        };
        let client = HttpClient::new(&HttpSettings::default()).unwrap();
        assert!(matches!(
            build_chat_model(&settings, client),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_missing_openai_key_is_config_error() {
        let settings = LlmSettings {
            provider: LlmProvider::OpenAi,
            openai_api_key: None,
            ..LlmSettings::default()
        };
        let client = HttpClient::new(&HttpSettings::default()).unwrap();
        assert!(matches!(
            build_chat_model(&settings, client),
            Err(ConfigError::Missing("llm.openai_api_key"))
        ));
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .temperature(0.2)
            .max_tokens(64)
            .json();
        assert_eq!(request.response_format, ResponseFormat::Json);
        assert_eq!(request.max_tokens, Some(64));
    }
}
