//! Paper index plugins.
//!
//! A [`Source`] answers keyword searches with ranked [`SearchResultHandle`]s
//! and fetches the full [`Document`] behind a handle. The arXiv index is the
//! only production implementation; [`MockSource`] backs tests.

mod arxiv;
pub mod mock;

pub use arxiv::{ArxivSource, ContentMode};
pub use mock::MockSource;

use async_trait::async_trait;
use std::time::Duration;

use crate::models::{Document, SearchQuery, SearchResultHandle};

/// The Source trait defines the interface for paper index plugins.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for papers matching the query.
    ///
    /// Results are ordered by submission date, newest first, and hold at most
    /// `query.max_results` entries. An empty list is not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultHandle>, SourceError>;

    /// Fetch the full document behind a search hit
    async fn fetch_document(&self, handle: &SearchResultHandle) -> Result<Document, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the source
    #[error("API error: {0}")]
    Api(String),

    /// Parsing error (Atom, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Paper not found
    #[error("Paper not found: {0}")]
    NotFound(String),

    /// The fetch did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// PDF content could not be turned into text
    #[error("PDF error: {0}")]
    Pdf(#[from] crate::utils::PdfExtractError),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<feed_rs::parser::ParseFeedError> for SourceError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        SourceError::Parse(format!("Atom: {}", err))
    }
}
