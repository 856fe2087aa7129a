//! Two-step article search workflow.
//!
//! `generate_search_query` turns the user's request into a [`StructuredQuery`];
//! `search_arxiv_papers` resolves the date window, searches and loads the
//! papers. Each step consumes the state of the previous stage.

use serde::Serialize;

use super::extraction::{ExtractionError, QueryExtractor};
use crate::models::{Document, StructuredQuery};
use crate::tools::{SearchPapersError, SearchPapersInput, SearchPapersTool, DEFAULT_MAX_RESULTS};

/// Request used when the caller does not supply one
pub const DEFAULT_USER_QUERY: &str = "I'm looking for the latest papers on AI on arXiv.";

/// Workflow state, one variant per stage
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ArticleSearchState {
    Start {
        user_query: String,
    },
    QueryExtracted {
        user_query: String,
        search_query: StructuredQuery,
    },
    Completed {
        user_query: String,
        search_query: StructuredQuery,
        papers: Vec<Document>,
    },
}

impl Default for ArticleSearchState {
    fn default() -> Self {
        Self::new(DEFAULT_USER_QUERY)
    }
}

impl ArticleSearchState {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self::Start {
            user_query: user_query.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::QueryExtracted { .. } => "query_extracted",
            Self::Completed { .. } => "completed",
        }
    }

    pub fn user_query(&self) -> &str {
        match self {
            Self::Start { user_query }
            | Self::QueryExtracted { user_query, .. }
            | Self::Completed { user_query, .. } => user_query,
        }
    }

    pub fn search_query(&self) -> Option<&StructuredQuery> {
        match self {
            Self::Start { .. } => None,
            Self::QueryExtracted { search_query, .. } | Self::Completed { search_query, .. } => {
                Some(search_query)
            }
        }
    }

    /// Loaded papers; empty before the search step has run
    pub fn papers(&self) -> &[Document] {
        match self {
            Self::Completed { papers, .. } => papers,
            _ => &[],
        }
    }
}

/// Errors that stop the workflow
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Query extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Search(#[from] SearchPapersError),

    #[error("Node '{node}' cannot run in stage '{stage}'")]
    InvalidStage { node: &'static str, stage: &'static str },
}

/// The article search workflow
#[derive(Debug, Clone)]
pub struct ArticleSearchGraph {
    extractor: QueryExtractor,
    search: SearchPapersTool,
    max_results: usize,
}

impl ArticleSearchGraph {
    pub const GENERATE_SEARCH_QUERY: &'static str = "generate_search_query";
    pub const SEARCH_ARXIV_PAPERS: &'static str = "search_arxiv_papers";

    pub fn new(extractor: QueryExtractor, search: SearchPapersTool) -> Self {
        Self {
            extractor,
            search,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Number of papers requested from the index
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Run both steps for a user request
    pub async fn invoke(&self, user_query: &str) -> Result<ArticleSearchState, GraphError> {
        let state = ArticleSearchState::new(user_query);
        let state = self.generate_search_query(state).await?;
        self.search_arxiv_papers(state).await
    }

    /// `Start` -> `QueryExtracted`
    pub async fn generate_search_query(
        &self,
        state: ArticleSearchState,
    ) -> Result<ArticleSearchState, GraphError> {
        let user_query = match state {
            ArticleSearchState::Start { user_query } => user_query,
            other => {
                return Err(GraphError::InvalidStage {
                    node: Self::GENERATE_SEARCH_QUERY,
                    stage: other.stage(),
                })
            }
        };

        tracing::info!(node = Self::GENERATE_SEARCH_QUERY, user_query = %user_query, "Running node");
        let search_query = self.extractor.extract(&user_query).await?;

        Ok(ArticleSearchState::QueryExtracted {
            user_query,
            search_query,
        })
    }

    /// `QueryExtracted` -> `Completed`
    pub async fn search_arxiv_papers(
        &self,
        state: ArticleSearchState,
    ) -> Result<ArticleSearchState, GraphError> {
        let (user_query, search_query) = match state {
            ArticleSearchState::QueryExtracted {
                user_query,
                search_query,
            } => (user_query, search_query),
            other => {
                return Err(GraphError::InvalidStage {
                    node: Self::SEARCH_ARXIV_PAPERS,
                    stage: other.stage(),
                })
            }
        };

        tracing::info!(
            node = Self::SEARCH_ARXIV_PAPERS,
            keywords = %search_query.keywords,
            latest = search_query.latest,
            "Running node"
        );

        let input = SearchPapersInput::new(&search_query.keywords)
            .is_latest(search_query.latest)
            .max_results(self.max_results);
        let papers = self.search.invoke_concurrent(&input).await?;

        if papers.is_empty() {
            tracing::warn!(keywords = %search_query.keywords, "No papers found on arXiv");
        }

        Ok(ArticleSearchState::Completed {
            user_query,
            search_query,
            papers,
        })
    }
}
