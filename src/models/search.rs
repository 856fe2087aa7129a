//! Search request models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured query extracted from a free-text request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredQuery {
    /// English search keywords
    pub keywords: String,

    /// Whether the user asked for the latest papers
    #[serde(default)]
    pub latest: bool,
}

impl StructuredQuery {
    pub fn new(keywords: impl Into<String>, latest: bool) -> Self {
        Self {
            keywords: keywords.into(),
            latest,
        }
    }

    /// JSON schema handed to the model as output format instructions
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "title": "StructuredQuery",
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "English keywords for searching arXiv"
                },
                "latest": {
                    "type": "boolean",
                    "description": "true if the user is asking for the latest papers, otherwise false",
                    "default": false
                }
            },
            "required": ["keywords"]
        })
    }
}

/// Submission date window, inclusive on both ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// A window with no bounds (no date filter)
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Sort order for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Search query parameters for a paper index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Keyword string
    pub keywords: String,

    /// Submission date filter
    pub window: DateWindow,

    /// Maximum number of results to return
    pub max_results: usize,

    /// Order on submission date
    pub sort_order: SortOrder,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            window: DateWindow::unbounded(),
            max_results: 10,
            sort_order: SortOrder::Descending,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set date window
    pub fn window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }
}
