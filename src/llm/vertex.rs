//! Gemini models on Vertex AI (`generateContent`).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::auth::{ServiceAccountKey, TokenSource};
use super::{status_error, ChatModel, ChatRequest, ChatResponse, LlmError, ResponseFormat, Role, TokenUsage};
use crate::config::{ConfigError, LlmSettings};
use crate::utils::HttpClient;

/// Vertex AI chat model authenticated with a service account
#[derive(Debug)]
pub struct VertexModel {
    client: HttpClient,
    tokens: TokenSource,
    endpoint: String,
    project: String,
    location: String,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl VertexModel {
    /// Build from settings, reading the service account key file
    pub fn from_settings(settings: &LlmSettings, client: HttpClient) -> Result<Self, ConfigError> {
        let key_path = settings
            .google_application_credentials
            .as_deref()
            .ok_or(ConfigError::Missing("llm.google_application_credentials"))?;
        let project = settings
            .google_cloud_project
            .clone()
            .ok_or(ConfigError::Missing("llm.google_cloud_project"))?;

        let key = ServiceAccountKey::from_file(key_path)?;
        let tokens = TokenSource::new(key, client.clone())?;

        Ok(Self::with_token_source(tokens, project, settings, client))
    }

    pub(crate) fn with_token_source(
        tokens: TokenSource,
        project: String,
        settings: &LlmSettings,
        client: HttpClient,
    ) -> Self {
        let endpoint = settings
            .vertex_endpoint
            .clone()
            .unwrap_or_else(|| regional_endpoint(&settings.google_cloud_location));

        Self {
            client,
            tokens,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project,
            location: settings.google_cloud_location.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.endpoint, self.project, self.location, self.model
        )
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let contents: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                let role = if m.role == Role::Assistant { "model" } else { "user" };
                json!({"role": role, "parts": [{"text": m.content}]})
            })
            .collect();

        let mut generation_config = json!({
            "temperature": request.temperature.unwrap_or(self.temperature),
        });
        if let Some(max) = request.max_tokens.or(self.max_output_tokens) {
            generation_config["maxOutputTokens"] = json!(max);
        }
        if request.response_format == ResponseFormat::Json {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });
        if !system.is_empty() {
            body["systemInstruction"] = json!({"parts": [{"text": system.join("\n\n")}]});
        }
        body
    }
}

fn regional_endpoint(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com", location)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[async_trait]
impl ChatModel for VertexModel {
    fn name(&self) -> String {
        format!("vertex/{}", self.model)
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let token = self.tokens.access_token().await?;

        tracing::debug!(model = %self.model, messages = request.messages.len(), "Calling Vertex AI");

        let response = self
            .client
            .post(self.url())
            .bearer_auth(token)
            .json(&self.request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: GenerateContentResponse = response.json().await?;
        let candidate = body.candidates.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(ChatResponse {
            content,
            finish_reason: candidate.finish_reason,
            usage: body.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
        })
    }
}
