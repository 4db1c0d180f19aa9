use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;

use super::{ExtractedDocument, ExtractionError, PageContent};

/// Map a parser load failure onto an extraction reason. The parser reports
/// missing or wrong passwords only through its message text.
pub fn classify_load_error(message: &str) -> ExtractionError {
    let lower = message.to_lowercase();
    if ["encrypt", "decrypt", "password"]
        .iter()
        .any(|k| lower.contains(k))
    {
        ExtractionError::encrypted(message)
    } else {
        ExtractionError::corrupt(message)
    }
}

/// Extract per-page text from PDF bytes.
///
/// Pages come from lopdf's page tree. If any page fails to decode, the whole
/// document is retried with pdf-extract, one string per page.
pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| classify_load_error(&e.to_string()))?;

    if doc.is_encrypted() {
        return Err(ExtractionError::encrypted(
            "document is encrypted and no password was supplied",
        ));
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        tracing::debug!("PDF has an empty page tree");
        return Ok(ExtractedDocument::default());
    }

    match extract_with_lopdf(&doc, &page_numbers) {
        Ok(pages) => Ok(ExtractedDocument { pages }),
        Err(e) => {
            tracing::warn!(error = %e, "lopdf page extraction failed, falling back to pdf-extract");
            extract_with_pdf_extract(bytes)
        }
    }
}

fn extract_with_lopdf(doc: &Document, page_numbers: &[u32]) -> Result<Vec<PageContent>, lopdf::Error> {
    page_numbers
        .iter()
        .map(|&n| {
            let text = doc.extract_text(&[n])?;
            Ok(PageContent {
                page_number: n as usize,
                text,
            })
        })
        .collect()
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
    // pdf-extract panics on some malformed font programs.
    let texts = match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(texts)) => texts,
        Ok(Err(e)) => return Err(ExtractionError::corrupt(format!("pdf-extract failed: {e}"))),
        Err(_) => return Err(ExtractionError::corrupt("pdf-extract aborted on malformed content")),
    };

    let pages = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| PageContent {
            page_number: i + 1,
            text,
        })
        .collect();

    Ok(ExtractedDocument { pages })
}
