use super::{ExtractedDocument, PageContent};

/// Wrap plain text as a single-page document so it can share the
/// normalize/chunk path with PDFs.
pub fn extract_txt(bytes: &[u8]) -> ExtractedDocument {
    // Try UTF-8 first, fall back to lossy conversion
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    ExtractedDocument {
        pages: vec![PageContent {
            page_number: 1,
            text,
        }],
    }
}
