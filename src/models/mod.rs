//! Core data models for paper search and retrieval.

mod paper;
mod search;

pub use paper::{Document, DocumentMetadata, SearchResultHandle};
pub use search::{DateWindow, SearchQuery, SortOrder, StructuredQuery};
