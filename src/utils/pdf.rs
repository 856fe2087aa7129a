//! PDF text extraction utilities.
//!
//! Extraction runs on the blocking thread pool since `pdf-extract` is CPU bound.

use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("Not a PDF document ({0} bytes, missing %PDF header)")]
    InvalidFile(usize),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extract text from PDF bytes.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, PdfExtractError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(PdfExtractError::InvalidFile(bytes.len()));
    }

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await?
        .map_err(|e| PdfExtractError::ExtractionFailed(e.to_string()))?;

    if text.trim().is_empty() {
        // scanned or image-only PDF
        tracing::debug!("Extracted empty text from PDF");
    }

    Ok(text)
}
