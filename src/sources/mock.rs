//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Document, SearchQuery, SearchResultHandle};
use crate::sources::{Source, SourceError};

/// A mock source for testing that returns predefined responses.
///
/// Documents are built from the handle's summary unless a fetch is marked as
/// failing or delayed.
#[derive(Debug, Default)]
pub struct MockSource {
    search_response: Mutex<Option<Vec<SearchResultHandle>>>,
    failing: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search response to return.
    pub fn set_search_response(&self, response: Vec<SearchResultHandle>) {
        let mut guard = self.search_response.lock().unwrap();
        *guard = Some(response);
    }

    /// Make fetching the given entry fail.
    pub fn fail_fetch(&self, entry_id: &str) {
        self.failing.lock().unwrap().insert(entry_id.to_string());
    }

    /// Delay fetching the given entry.
    pub fn delay_fetch(&self, entry_id: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(entry_id.to_string(), delay);
    }

    /// Queries received by `search`, oldest first.
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultHandle>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        let guard = self.search_response.lock().unwrap();
        let mut handles = guard.clone().unwrap_or_default();
        handles.truncate(query.max_results);
        Ok(handles)
    }

    async fn fetch_document(&self, handle: &SearchResultHandle) -> Result<Document, SourceError> {
        let delay = self.delays.lock().unwrap().get(&handle.entry_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&handle.entry_id) {
            return Err(SourceError::Network(format!(
                "simulated failure for {}",
                handle.entry_id
            )));
        }

        Ok(Document::from_handle(handle, &handle.summary, usize::MAX))
    }
}

/// Helper function to create a mock handle for testing.
pub fn make_handle(entry_id: &str, title: &str) -> SearchResultHandle {
    SearchResultHandle::new(entry_id, title, format!("http://example.com/{}", entry_id))
        .summary(format!("Abstract of {}", title))
}
