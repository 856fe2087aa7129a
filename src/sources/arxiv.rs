//! arXiv research source implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::parser;

use crate::config::SearchSettings;
use crate::models::{DateWindow, Document, SearchQuery, SearchResultHandle, SortOrder};
use crate::sources::{Source, SourceError};
use crate::utils::{extract_text, HttpClient};

/// arXiv caps `max_results` per request
const ARXIV_MAX_RESULTS: usize = 200;

/// What a fetched document carries as its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Download the PDF and extract its text
    FullText,
    /// Use the abstract only
    Summary,
}

/// arXiv research source
///
/// Supports:
/// - Search by keywords within a submission date window
/// - Fetching a paper's metadata and full text by ID
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: HttpClient,
    api_url: String,
    pdf_url: String,
    content_mode: ContentMode,
    max_content_chars: usize,
}

impl ArxivSource {
    /// Create a new arXiv source from search settings
    pub fn new(client: HttpClient, settings: &SearchSettings) -> Self {
        let content_mode = if settings.load_full_text {
            ContentMode::FullText
        } else {
            ContentMode::Summary
        };

        Self {
            client,
            api_url: settings.arxiv_api_url.clone(),
            pdf_url: settings.arxiv_pdf_url.clone(),
            content_mode,
            max_content_chars: settings.max_content_chars,
        }
    }

    /// Create against custom endpoints (for testing)
    pub fn with_base_urls(
        client: HttpClient,
        api_url: impl Into<String>,
        pdf_url: impl Into<String>,
    ) -> Self {
        Self::new(client, &SearchSettings::default()).base_urls(api_url, pdf_url)
    }

    fn base_urls(mut self, api_url: impl Into<String>, pdf_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.pdf_url = pdf_url.into();
        self
    }

    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = mode;
        self
    }

    pub fn max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    /// Parse an arXiv ID from various formats
    ///
    /// Handles formats like:
    /// - "2301.12345"
    /// - "2301.12345v1" (version is stripped)
    /// - "arxiv:2301.12345"
    /// - "http://arxiv.org/abs/2301.12345v1"
    /// - "hep-th/9901001v2"
    pub fn parse_id(id: &str) -> Result<String, SourceError> {
        let id = id.trim();

        let id = match id.find("/abs/") {
            Some(pos) => &id[pos + 5..],
            None => id,
        };

        let id = if id.get(..6).is_some_and(|p| p.eq_ignore_ascii_case("arxiv:")) {
            &id[6..]
        } else {
            id
        };

        let id = strip_version(id);

        if id.is_empty() {
            return Err(SourceError::InvalidRequest("Empty arXiv ID".to_string()));
        }

        Ok(id.to_string())
    }

    /// Render the inclusive submission date clause, `None` for an unbounded window
    fn date_clause(window: &DateWindow) -> Option<String> {
        if window.is_unbounded() {
            return None;
        }

        let fmt = |d: Option<DateTime<Utc>>| {
            d.map(|d| d.format("%Y%m%d").to_string())
                .unwrap_or_else(|| "*".to_string())
        };

        Some(format!(
            "submittedDate:[{} TO {}]",
            fmt(window.start),
            fmt(window.end)
        ))
    }

    /// Build search query for arXiv API
    fn build_search_query(query: &SearchQuery) -> String {
        let mut parts = Vec::new();

        let terms: Vec<String> = query
            .keywords
            .split_whitespace()
            .map(|t| format!("all:{}", t))
            .collect();

        match terms.len() {
            0 => {}
            1 => parts.push(terms[0].clone()),
            _ => parts.push(format!("({})", terms.join(" AND "))),
        }

        if let Some(clause) = Self::date_clause(&query.window) {
            parts.push(clause);
        }

        if parts.is_empty() {
            "all:*".to_string()
        } else {
            parts.join(" AND ")
        }
    }

    fn pdf_link(&self, paper_id: &str) -> String {
        format!("{}/{}", self.pdf_url, paper_id)
    }

    /// Parse arXiv Atom feed entry into a search result handle
    fn parse_entry(&self, entry: &feed_rs::model::Entry) -> Result<SearchResultHandle, SourceError> {
        let paper_id = Self::parse_id(&entry.id)
            .map_err(|_| SourceError::Parse("Missing paper ID".to_string()))?;

        let title = entry
            .title
            .as_ref()
            .map(|t| collapse_whitespace(&t.content))
            .unwrap_or_default();

        let authors = entry.authors.iter().map(|a| a.name.clone()).collect();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| collapse_whitespace(&s.content))
            .unwrap_or_default();

        let pdf_url = entry
            .links
            .iter()
            .find(|l| l.media_type.as_deref() == Some("application/pdf"))
            .map(|l| l.href.clone())
            .unwrap_or_else(|| self.pdf_link(&paper_id));

        let categories = entry.categories.iter().map(|c| c.term.clone()).collect();

        let mut handle = SearchResultHandle::new(paper_id, title, entry.id.clone())
            .authors(authors)
            .summary(summary)
            .pdf_url(pdf_url)
            .categories(categories);

        if let Some(published) = entry.published {
            handle = handle.published(published);
        }
        if let Some(updated) = entry.updated {
            handle = handle.updated(updated);
        }

        Ok(handle)
    }

    async fn fetch_feed(&self, url: &str) -> Result<feed_rs::model::Feed, SourceError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        Ok(parser::parse(bytes.as_ref())?)
    }

    /// Look up a single paper's metadata by ID
    pub async fn lookup(&self, paper_id: &str) -> Result<SearchResultHandle, SourceError> {
        let paper_id = Self::parse_id(paper_id)?;
        let url = format!(
            "{}?id_list={}&max_results=1",
            self.api_url,
            urlencoding::encode(&paper_id)
        );

        let feed = self.fetch_feed(&url).await?;
        let entry = feed
            .entries
            .first()
            .ok_or_else(|| SourceError::NotFound(paper_id.clone()))?;

        self.parse_entry(entry)
    }

    async fn download_pdf(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to download PDF: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PDF download returned status: {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultHandle>, SourceError> {
        let search_query = Self::build_search_query(query);
        let max_results = query.max_results.min(ARXIV_MAX_RESULTS);

        let sort_order = match query.sort_order {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        };

        let url = format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=submittedDate&sortOrder={}",
            self.api_url,
            urlencoding::encode(&search_query),
            max_results,
            sort_order
        );

        tracing::debug!(query = %search_query, max_results, "Searching arXiv");

        let feed = self.fetch_feed(&url).await?;

        let mut handles = feed
            .entries
            .iter()
            .map(|entry| self.parse_entry(entry))
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps the API's ranking among equal dates; undated entries count as oldest
        match query.sort_order {
            SortOrder::Descending => handles.sort_by(|a, b| b.published.cmp(&a.published)),
            SortOrder::Ascending => handles.sort_by(|a, b| a.published.cmp(&b.published)),
        }
        handles.truncate(max_results);

        tracing::debug!(count = handles.len(), "arXiv search finished");
        Ok(handles)
    }

    async fn fetch_document(&self, handle: &SearchResultHandle) -> Result<Document, SourceError> {
        // Search hits already carry metadata; only bare handles need an id lookup
        let looked_up;
        let paper = if handle.summary.is_empty() {
            looked_up = self.lookup(&handle.entry_id).await?;
            &looked_up
        } else {
            handle
        };

        let content = match self.content_mode {
            ContentMode::Summary => paper.summary.clone(),
            ContentMode::FullText => {
                let url = paper
                    .pdf_url
                    .clone()
                    .unwrap_or_else(|| self.pdf_link(&paper.entry_id));
                let bytes = self.download_pdf(&url).await?;
                extract_text(bytes).await?
            }
        };

        Ok(Document::from_handle(paper, &content, self.max_content_chars))
    }
}

/// Strip a trailing version suffix such as "v2"
fn strip_version(id: &str) -> &str {
    match id.rfind('v') {
        Some(pos)
            if pos > 0
                && pos + 1 < id.len()
                && id[pos + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
