//! Utility modules shared across the crate.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts from settings
//! - [`extract_text`]: extract text content from PDF bytes
//! - [`PdfExtractError`]: errors that can occur during PDF extraction

mod http;
mod pdf;

pub use http::HttpClient;
pub use pdf::{extract_text, PdfExtractError};
