//! OpenAI chat completions.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{status_error, ChatModel, ChatRequest, ChatResponse, LlmError, ResponseFormat, TokenUsage};
use crate::config::{ConfigError, LlmSettings};
use crate::utils::HttpClient;

/// OpenAI-compatible chat model
pub struct OpenAiModel {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiModel {
    pub fn from_settings(settings: &LlmSettings, client: HttpClient) -> Result<Self, ConfigError> {
        let api_key = settings
            .openai_api_key
            .clone()
            .ok_or(ConfigError::Missing("llm.openai_api_key"))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.openai_base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        })
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(self.temperature),
        });
        if let Some(max) = request.max_tokens.or(self.max_output_tokens) {
            body["max_tokens"] = json!(max);
        }
        if request.response_format == ResponseFormat::Json {
            body["response_format"] = json!({"type": "json_object"});
        }
        body
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiModel {
    fn name(&self) -> String {
        format!("openai/{}", self.model)
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        tracing::debug!(model = %self.model, messages = request.messages.len(), "Calling OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: CompletionResponse = response.json().await?;
        let choice = body.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        let content = choice
            .message
            .content
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(ChatResponse {
            content,
            finish_reason: choice.finish_reason,
            usage: body.usage,
        })
    }
}
