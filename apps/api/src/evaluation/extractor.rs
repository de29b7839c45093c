//! Document → plain text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not read the uploaded document as a PDF: {0}")]
    Parse(String),
}

/// Converts an uploaded document into plain text. Blocking; run it off the async runtime.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF extraction via `pdf-extract`.
///
/// Pages are joined with `\n`. A page without extractable text contributes an
/// empty string, so page boundaries are preserved even for scanned pages.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;
        Ok(join_pages(&pages))
    }
}

fn join_pages(pages: &[String]) -> String {
    pages.join("\n")
}
