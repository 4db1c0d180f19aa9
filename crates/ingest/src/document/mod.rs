pub mod chunker;
pub mod metadata;
pub mod normalize;
mod pdf;
mod txt;

pub use folio_core::{ExtractionError, ExtractionReason};
pub use normalize::{normalize_pages, NormalizedText, PageSpan};
pub use pdf::{classify_load_error, extract_pdf};
pub use txt::extract_txt;

/// A page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// 1-based page number. Plain text is always page 1.
    pub page_number: usize,
    /// Raw extracted text, before normalization.
    pub text: String,
}

/// Result of extracting text from a document. Pages may all be empty; that
/// is a valid document with nothing to chunk, not a failure.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }

    pub fn normalize(&self) -> NormalizedText {
        normalize_pages(&self.pages)
    }
}
