//! Single-node chatbot workflows.

use std::sync::Arc;

use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError};

/// Reply of the fixed-greeting chatbot
pub const GREETING: &str = "Hello! I'm a simple LangGraph chatbot.";

/// How the chatbot node produces its reply
#[derive(Debug, Clone)]
pub enum Responder {
    /// Always answer with [`GREETING`]
    Fixed,
    /// Forward the conversation to a model
    Model(Arc<dyn ChatModel>),
}

/// Appends one assistant reply to a conversation
#[derive(Debug, Clone)]
pub struct ChatbotGraph {
    responder: Responder,
}

impl ChatbotGraph {
    pub fn fixed() -> Self {
        Self {
            responder: Responder::Fixed,
        }
    }

    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        Self {
            responder: Responder::Model(model),
        }
    }

    /// Run the `chatbot` node and return the extended conversation
    pub async fn invoke(&self, mut messages: Vec<ChatMessage>) -> Result<Vec<ChatMessage>, LlmError> {
        tracing::info!(node = "chatbot", messages = messages.len(), "Running node");

        let reply = match &self.responder {
            Responder::Fixed => GREETING.to_string(),
            Responder::Model(model) => {
                model
                    .complete(&ChatRequest::new(messages.clone()))
                    .await?
                    .content
            }
        };

        messages.push(ChatMessage::assistant(reply));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockChatModel, Role};

    #[tokio::test]
    async fn test_fixed_greeting() {
        let messages = ChatbotGraph::fixed()
            .invoke(vec![ChatMessage::user("hi")])
            .await
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], ChatMessage::assistant(GREETING));
        assert_eq!(messages[1].content, "Hello! I'm a simple LangGraph chatbot.");
    }

    #[tokio::test]
    async fn test_model_reply_sees_history() {
        let model = Arc::new(MockChatModel::new().reply("I am a research assistant."));
        let graph = ChatbotGraph::with_model(model.clone());

        let messages = graph
            .invoke(vec![ChatMessage::user("Can you introduce yourself?")])
            .await
            .unwrap();

        assert_eq!(messages.last().unwrap().role, Role::Assistant);
        assert_eq!(messages.last().unwrap().content, "I am a research assistant.");
        assert_eq!(model.requests()[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let graph = ChatbotGraph::with_model(Arc::new(MockChatModel::new().fail("down")));
        assert!(graph.invoke(vec![ChatMessage::user("hi")]).await.is_err());
    }
}
