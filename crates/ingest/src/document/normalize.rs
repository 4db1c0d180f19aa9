//! Whitespace normalization applied once before chunking and entity
//! recognition.
//!
//! Within a paragraph every whitespace run becomes a single space. A blank
//! line becomes a single `\n`, and pages are joined with `\n\n`, so the
//! chunker can rank page and paragraph breaks above plain spaces.

use super::PageContent;

pub const PAGE_BREAK: &str = "\n\n";
pub const PARAGRAPH_BREAK: &str = "\n";

/// Character range of one page inside the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub page_number: usize,
    /// Half-open range, in characters.
    pub start: usize,
    pub end: usize,
}

/// Normalized document text plus a page-offset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    /// Spans for non-empty pages, in reading order.
    pub pages: Vec<PageSpan>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters (not bytes) in the text.
    pub fn char_len(&self) -> usize {
        self.pages.last().map(|p| p.end).unwrap_or(0)
    }

    /// Page containing the character at `offset`. Offsets that fall inside
    /// a page break belong to the following page.
    pub fn page_at(&self, offset: usize) -> usize {
        self.pages
            .iter()
            .find(|p| offset < p.end)
            .or(self.pages.last())
            .map(|p| p.page_number)
            .unwrap_or(1)
    }
}

/// Normalize raw page text and join pages with page-break markers.
pub fn normalize_pages(pages: &[PageContent]) -> NormalizedText {
    let mut out = NormalizedText::default();
    let mut cursor = 0usize;

    for page in pages {
        let text = normalize_page(&page.text);
        if text.is_empty() {
            continue;
        }
        if !out.text.is_empty() {
            out.text.push_str(PAGE_BREAK);
            cursor += PAGE_BREAK.len();
        }
        let len = text.chars().count();
        out.pages.push(PageSpan {
            page_number: page.page_number,
            start: cursor,
            end: cursor + len,
        });
        out.text.push_str(&text);
        cursor += len;
    }
    out
}

/// Normalize a single page: unify line endings, re-join hyphenated line
/// breaks, collapse whitespace and keep blank lines as paragraph markers.
pub fn normalize_page(raw: &str) -> String {
    let unified = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\x0C', "\n");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in unified.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        append_line(&mut current, line);
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join(PARAGRAPH_BREAK)
}

fn append_line(current: &mut String, line: &str) {
    if ends_with_word_hyphen(current) {
        match line.chars().next() {
            // "exam-" + "ple" was one word split by layout.
            Some(c) if c.is_lowercase() => {
                current.pop();
            }
            // "Jean-" + "Luc" keeps its hyphen.
            Some(c) if c.is_alphanumeric() => {}
            _ => current.push(' '),
        }
    } else if !current.is_empty() {
        current.push(' ');
    }

    for (i, word) in line.split_whitespace().enumerate() {
        if i > 0 {
            current.push(' ');
        }
        current.push_str(word);
    }
}

fn ends_with_word_hyphen(s: &str) -> bool {
    let mut tail = s.chars().rev();
    tail.next() == Some('-') && tail.next().is_some_and(|c| c.is_alphanumeric())
}
