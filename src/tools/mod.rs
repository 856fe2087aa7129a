//! Paper search and retrieval pipeline.
//!
//! - [`date_range`]: derive the submission date window
//! - [`DocumentLoader`]: fetch documents for search hits, skipping failures
//! - [`SearchPapersTool`]: resolve window, search, load

pub mod date_range;
mod loader;
mod search_papers;

pub use loader::{DocumentLoader, LoaderError};
pub use search_papers::{
    SearchPapersError, SearchPapersInput, SearchPapersTool, DEFAULT_MAX_RESULTS,
};
