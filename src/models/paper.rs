//! Paper models: search result handles and loaded documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ranked search hit returned by a paper index
///
/// Carries enough metadata to fetch the full document later. Handles are not
/// deduplicated; if the index returns the same paper twice, both are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultHandle {
    /// External identifier (arXiv ID without version suffix)
    pub entry_id: String,

    /// Paper title
    pub title: String,

    /// Author names in listed order
    pub authors: Vec<String>,

    /// Abstract text
    pub summary: String,

    /// Paper page URL
    pub url: String,

    /// Direct PDF URL
    pub pdf_url: Option<String>,

    /// Submission date
    pub published: Option<DateTime<Utc>>,

    /// Last updated date
    pub updated: Option<DateTime<Utc>>,

    /// Subject categories
    pub categories: Vec<String>,
}

impl SearchResultHandle {
    /// Create a new handle with required fields
    pub fn new(entry_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            title: title.into(),
            authors: Vec::new(),
            summary: String::new(),
            url: url.into(),
            pdf_url: None,
            published: None,
            updated: None,
            categories: Vec::new(),
        }
    }

    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_url = Some(url.into());
        self
    }

    pub fn published(mut self, date: DateTime<Utc>) -> Self {
        self.published = Some(date);
        self
    }

    pub fn updated(mut self, date: DateTime<Utc>) -> Self {
        self.updated = Some(date);
        self
    }

    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }
}

/// Metadata attached to a loaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub entry_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub summary: String,
    pub pdf_url: Option<String>,
    pub categories: Vec<String>,
}

impl From<&SearchResultHandle> for DocumentMetadata {
    fn from(handle: &SearchResultHandle) -> Self {
        Self {
            entry_id: handle.entry_id.clone(),
            title: handle.title.clone(),
            authors: handle.authors.clone(),
            published: handle.published,
            summary: handle.summary.clone(),
            pdf_url: handle.pdf_url.clone(),
            categories: handle.categories.clone(),
        }
    }
}

/// Full text and metadata of one paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Build a document from a handle and its content, keeping at most
    /// `max_chars` characters of content
    pub fn from_handle(handle: &SearchResultHandle, content: &str, max_chars: usize) -> Self {
        Self {
            page_content: truncate_chars(content, max_chars),
            metadata: DocumentMetadata::from(handle),
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_handle_builder() {
        let published = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let handle = SearchResultHandle::new("2403.00001", "Diffusion", "http://arxiv.org/abs/2403.00001")
            .authors(vec!["Ada Lovelace".to_string()])
            .summary("About diffusion.")
            .pdf_url("https://arxiv.org/pdf/2403.00001")
            .published(published);

        assert_eq!(handle.entry_id, "2403.00001");
        assert_eq!(handle.authors, vec!["Ada Lovelace"]);
        assert_eq!(handle.published, Some(published));
        assert!(handle.pdf_url.is_some());
    }

    #[test]
    fn test_document_truncates_by_chars() {
        let handle = SearchResultHandle::new("1", "T", "u");
        let doc = Document::from_handle(&handle, "ééééé", 3);
        assert_eq!(doc.page_content, "ééé");

        let doc = Document::from_handle(&handle, "short", 100);
        assert_eq!(doc.page_content, "short");
        assert_eq!(doc.metadata.entry_id, "1");
    }
}
