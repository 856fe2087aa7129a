//! LLM-backed extraction of a structured arXiv query from free text.

use std::sync::Arc;

use crate::llm::parser::{format_instructions, parse_json, OutputParseError};
use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::models::StructuredQuery;

const SYSTEM_INSTRUCTION: &str = "You are an expert at searching for papers on arXiv.\n\
From the user's question below, extract English keywords suited to an arXiv paper search \
and whether the user is asking for the latest papers, then answer in the specified JSON format.\n\n\
JSON format: ";

/// Errors from query extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Parse(#[from] OutputParseError),

    #[error("Model returned empty keywords")]
    EmptyKeywords,

    #[error("Model call failed: {0}")]
    Provider(#[from] LlmError),
}

/// Turns a user request into a [`StructuredQuery`]
#[derive(Debug, Clone)]
pub struct QueryExtractor {
    model: Arc<dyn ChatModel>,
}

impl QueryExtractor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    fn request(user_query: &str) -> ChatRequest {
        let system = format!(
            "{}{}",
            SYSTEM_INSTRUCTION,
            format_instructions(&StructuredQuery::json_schema())
        );

        ChatRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(format!("User question: {}", user_query)),
        ])
        .json()
    }

    /// Ask the model for keywords and recency intent.
    ///
    /// Output that is not JSON for a [`StructuredQuery`], or that carries blank
    /// keywords, is an error. There is no retry.
    pub async fn extract(&self, user_query: &str) -> Result<StructuredQuery, ExtractionError> {
        let response = self.model.complete(&Self::request(user_query)).await?;

        let mut query: StructuredQuery = parse_json(&response.content)?;
        query.keywords = query.keywords.trim().to_string();
        if query.keywords.is_empty() {
            return Err(ExtractionError::EmptyKeywords);
        }

        tracing::debug!(keywords = %query.keywords, latest = query.latest, "Extracted search query");
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockChatModel, ResponseFormat, Role};

    #[tokio::test]
    async fn test_extracts_exact_fields() {
        let model = Arc::new(
            MockChatModel::new().reply(r#"{"keywords": "transformer attention", "latest": true}"#),
        );
        let extractor = QueryExtractor::new(model.clone());

        let query = extractor.extract("latest work on attention").await.unwrap();
        assert_eq!(query, StructuredQuery::new("transformer attention", true));

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].response_format, ResponseFormat::Json);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert!(requests[0].messages[0].content.contains("\"keywords\""));
        assert_eq!(requests[0].messages[1].content, "User question: latest work on attention");
    }

    #[tokio::test]
    async fn test_malformed_output_is_parse_error() {
        let extractor = QueryExtractor::new(Arc::new(MockChatModel::new().reply("keywords: attention")));
        assert!(matches!(
            extractor.extract("anything").await,
            Err(ExtractionError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_keywords_rejected() {
        let extractor =
            QueryExtractor::new(Arc::new(MockChatModel::new().reply(r#"{"keywords": "  "}"#)));
        assert!(matches!(
            extractor.extract("anything").await,
            Err(ExtractionError::EmptyKeywords)
        ));
    }

    #[tokio::test]
    async fn test_provider_failure() {
        let extractor = QueryExtractor::new(Arc::new(MockChatModel::new().fail("boom")));
        assert!(matches!(
            extractor.extract("anything").await,
            Err(ExtractionError::Provider(LlmError::Status { status: 500, .. }))
        ));
    }
}
