//! Mock chat model for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ChatModel, ChatRequest, ChatResponse, LlmError};

/// A chat model that replays scripted replies in order.
///
/// Once the script is exhausted every call fails with [`LlmError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct MockChatModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Queue a provider failure, reported as an HTTP 500.
    pub fn fail(self, body: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(body.into()));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> String {
        "mock".to_string()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(ChatResponse {
                content,
                finish_reason: Some("stop".to_string()),
                usage: None,
            }),
            Some(Err(body)) => Err(LlmError::Status { status: 500, body }),
            None => Err(LlmError::EmptyResponse),
        }
    }
}
