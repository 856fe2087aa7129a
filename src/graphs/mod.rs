//! Agent workflows built on the chat model and paper search layers.

mod article_search;
mod chatbot;
mod extraction;

pub use article_search::{ArticleSearchGraph, ArticleSearchState, GraphError, DEFAULT_USER_QUERY};
pub use chatbot::{ChatbotGraph, Responder, GREETING};
pub use extraction::{ExtractionError, QueryExtractor};
