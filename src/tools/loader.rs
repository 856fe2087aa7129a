//! Document loading with best-effort aggregation.
//!
//! Every handle is fetched independently. A fetch that fails or times out is
//! logged and skipped; the batch only fails when nothing could be loaded.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::config::SearchSettings;
use crate::models::{Document, SearchResultHandle};
use crate::sources::{Source, SourceError};

/// Errors raised by the document loader
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("No documents found for paper IDs: {0:?}")]
    NoDocuments(Vec<String>),
}

/// Loads full documents for search result handles
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    source: Arc<dyn Source>,
    max_concurrency: usize,
    fetch_timeout: Duration,
}

impl DocumentLoader {
    pub fn new(source: Arc<dyn Source>, max_concurrency: usize, fetch_timeout: Duration) -> Self {
        Self {
            source,
            max_concurrency: max_concurrency.max(1),
            fetch_timeout,
        }
    }

    pub fn from_settings(source: Arc<dyn Source>, settings: &SearchSettings) -> Self {
        Self::new(
            source,
            settings.max_concurrency,
            Duration::from_secs(settings.fetch_timeout_secs),
        )
    }

    /// Load documents one after another.
    pub async fn load(&self, handles: &[SearchResultHandle]) -> Result<Vec<Document>, LoaderError> {
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(self.fetch_one(handle).await);
        }
        Self::collect(handles, results)
    }

    /// Load documents with at most `max_concurrency` fetches in flight.
    ///
    /// Successful documents keep the relative order of their handles.
    pub async fn load_concurrent(
        &self,
        handles: &[SearchResultHandle],
    ) -> Result<Vec<Document>, LoaderError> {
        let fetches: Vec<_> = handles.iter().map(|handle| self.fetch_one(handle)).collect();
        let results = stream::iter(fetches)
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await;
        Self::collect(handles, results)
    }

    async fn fetch_one(&self, handle: &SearchResultHandle) -> Option<Document> {
        let result = match tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch_document(handle),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.fetch_timeout)),
        };

        match result {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(
                    source = self.source.id(),
                    entry_id = %handle.entry_id,
                    error = %e,
                    "Skipping document that failed to load"
                );
                None
            }
        }
    }

    fn collect(
        handles: &[SearchResultHandle],
        results: Vec<Option<Document>>,
    ) -> Result<Vec<Document>, LoaderError> {
        let documents: Vec<Document> = results.into_iter().flatten().collect();

        if documents.is_empty() {
            return Err(LoaderError::NoDocuments(
                handles.iter().map(|h| h.entry_id.clone()).collect(),
            ));
        }

        tracing::debug!(
            loaded = documents.len(),
            requested = handles.len(),
            "Documents loaded"
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{make_handle, MockSource};

    fn handles() -> Vec<SearchResultHandle> {
        vec![
            make_handle("1", "First"),
            make_handle("2", "Second"),
            make_handle("3", "Third"),
        ]
    }

    fn loader(source: MockSource) -> DocumentLoader {
        DocumentLoader::new(Arc::new(source), 3, Duration::from_millis(200))
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.metadata.entry_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_skips_failed_fetch() {
        let source = MockSource::new();
        source.fail_fetch("2");
        let loader = loader(source);

        let docs = loader.load(&handles()).await.unwrap();
        assert_eq!(ids(&docs), vec!["1", "3"]);

        let docs = loader.load_concurrent(&handles()).await.unwrap();
        assert_eq!(ids(&docs), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_all_failures_is_no_documents() {
        let source = MockSource::new();
        for id in ["1", "2", "3"] {
            source.fail_fetch(id);
        }
        let loader = loader(source);

        let err = loader.load_concurrent(&handles()).await.unwrap_err();
        match err {
            LoaderError::NoDocuments(missing) => assert_eq!(missing, vec!["1", "2", "3"]),
        }
        assert!(loader.load(&handles()).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_input_is_no_documents() {
        let loader = loader(MockSource::new());
        assert!(matches!(
            loader.load(&[]).await,
            Err(LoaderError::NoDocuments(missing)) if missing.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_concurrent_preserves_order_with_slow_fetch() {
        let source = MockSource::new();
        source.delay_fetch("1", Duration::from_millis(50));
        let loader = loader(source);

        let docs = loader.load_concurrent(&handles()).await.unwrap();
        assert_eq!(ids(&docs), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_concurrent_load_runs_on_spawned_task() {
        // tool handlers box this future as Send
        let loader = loader(MockSource::new());
        let docs = tokio::spawn(async move { loader.load_concurrent(&handles()).await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids(&docs), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_timed_out_fetch_is_skipped() {
        let source = MockSource::new();
        source.delay_fetch("3", Duration::from_secs(5));
        let loader = loader(source);

        let docs = loader.load_concurrent(&handles()).await.unwrap();
        assert_eq!(ids(&docs), vec!["1", "2"]);
    }
}
