//! Paper search tool: date window, index search and document loading in one call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::date_range;
use super::loader::{DocumentLoader, LoaderError};
use crate::config::SearchSettings;
use crate::models::{DateWindow, Document, SearchQuery, SearchResultHandle, SortOrder};
use crate::sources::{Source, SourceError};

/// Input for the paper search tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPapersInput {
    /// The search query for academic papers
    pub query: String,

    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Whether to restrict results to the latest papers
    #[serde(default = "default_is_latest")]
    pub is_latest: bool,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Papers returned when the caller does not say
pub const DEFAULT_MAX_RESULTS: usize = 3;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_is_latest() -> bool {
    true
}

impl SearchPapersInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: default_max_results(),
            is_latest: default_is_latest(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn is_latest(mut self, latest: bool) -> Self {
        self.is_latest = latest;
        self
    }

    pub fn window(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Resolve the date window for this input at the current time
    pub fn resolve_window(&self) -> DateWindow {
        date_range::resolve(self.is_latest, self.start_time, self.end_time)
    }
}

/// Errors surfaced by the paper search tool
#[derive(Debug, thiserror::Error)]
pub enum SearchPapersError {
    #[error("Search failed: {0}")]
    Search(#[from] SourceError),

    #[error(transparent)]
    Load(#[from] LoaderError),
}

/// Searches a paper index and loads the hits as documents
#[derive(Debug, Clone)]
pub struct SearchPapersTool {
    source: Arc<dyn Source>,
    loader: DocumentLoader,
}

impl SearchPapersTool {
    pub const NAME: &'static str = "search_papers";
    pub const DESCRIPTION: &'static str =
        "Search for academic papers on arXiv. Returns a list of documents with metadata.";

    pub fn new(source: Arc<dyn Source>, loader: DocumentLoader) -> Self {
        Self { source, loader }
    }

    pub fn from_settings(source: Arc<dyn Source>, settings: &SearchSettings) -> Self {
        let loader = DocumentLoader::from_settings(Arc::clone(&source), settings);
        Self::new(source, loader)
    }

    /// Resolve the date window and query the index.
    pub async fn search(
        &self,
        input: &SearchPapersInput,
    ) -> Result<Vec<SearchResultHandle>, SearchPapersError> {
        let window = input.resolve_window();
        let query = SearchQuery::new(&input.query)
            .max_results(input.max_results)
            .window(window)
            .sort_order(SortOrder::Descending);

        tracing::info!(
            source = self.source.id(),
            query = %input.query,
            start = ?window.start,
            end = ?window.end,
            "Searching papers"
        );

        Ok(self.source.search(&query).await?)
    }

    /// Load documents for search hits, one at a time.
    pub async fn load(&self, handles: &[SearchResultHandle]) -> Result<Vec<Document>, SearchPapersError> {
        Ok(self.loader.load(handles).await?)
    }

    /// Load documents for search hits concurrently.
    pub async fn load_concurrent(
        &self,
        handles: &[SearchResultHandle],
    ) -> Result<Vec<Document>, SearchPapersError> {
        Ok(self.loader.load_concurrent(handles).await?)
    }

    /// Search and load sequentially. An empty search yields an empty list.
    pub async fn invoke(&self, input: &SearchPapersInput) -> Result<Vec<Document>, SearchPapersError> {
        let handles = self.search(input).await?;
        if handles.is_empty() {
            return Ok(Vec::new());
        }
        self.load(&handles).await
    }

    /// Search and load with concurrent document fetches.
    pub async fn invoke_concurrent(
        &self,
        input: &SearchPapersInput,
    ) -> Result<Vec<Document>, SearchPapersError> {
        let handles = self.search(input).await?;
        if handles.is_empty() {
            return Ok(Vec::new());
        }
        self.load_concurrent(&handles).await
    }
}
