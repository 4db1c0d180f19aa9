//! Sliding-window splitter with separator priority.

use folio_core::ConfigError;

use super::helpers::{count_words, find_cut, next_start, skip_whitespace, trim_range};
use super::types::{chunk_id, Chunk, ChunkConfig};
use crate::document::normalize::{normalize_pages, NormalizedText};
use crate::document::PageContent;

/// Splits normalized text into overlapping, bounded chunks.
///
/// Output depends only on the text and the config, so identical input always
/// yields identical boundaries and ids.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Validates the config up front; an overlap as large as the chunk size
    /// is rejected here rather than on first use.
    pub fn new(config: ChunkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Normalize a plain string as a single page and split it.
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        let doc = normalize_pages(&[PageContent {
            page_number: 1,
            text: text.to_string(),
        }]);
        self.split(&doc)
    }

    /// Split normalized document text.
    pub fn split(&self, doc: &NormalizedText) -> Vec<Chunk> {
        let chars: Vec<char> = doc.text.chars().collect();
        let ranges = self.ranges(&chars);
        tracing::debug!(
            chars = chars.len(),
            chunks = ranges.len(),
            chunk_size = self.config.chunk_size,
            "split text"
        );

        ranges
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let content: String = chars[start..end].iter().collect();
                Chunk {
                    index,
                    chunk_id: chunk_id(index),
                    word_count: count_words(&content),
                    char_count: end - start,
                    content,
                    char_start: start,
                    char_end: end,
                    page_start: doc.page_at(start),
                    page_end: doc.page_at(end - 1),
                }
            })
            .collect()
    }

    /// Character ranges of every chunk, after the short-tail merge.
    fn ranges(&self, chars: &[char]) -> Vec<(usize, usize)> {
        let ChunkConfig {
            chunk_size,
            chunk_overlap,
            min_chunk_size,
        } = self.config;
        let n = chars.len();
        let mut ranges: Vec<(usize, usize)> = Vec::new();

        let mut start = skip_whitespace(chars, 0);
        while start < n {
            let hard_end = (start + chunk_size).min(n);
            let cut = if hard_end == n {
                n
            } else {
                find_cut(chars, start + chunk_size - chunk_overlap, hard_end)
            };

            if let Some(range) = trim_range(chars, start, cut) {
                ranges.push(range);
            }
            if cut >= n {
                break;
            }
            start = skip_whitespace(chars, next_start(chars, start, cut, chunk_overlap));
        }

        // A short tail is folded into its predecessor instead of standing alone.
        if ranges.len() >= 2 {
            if let Some(&(tail_start, tail_end)) = ranges.last() {
                if tail_end - tail_start < min_chunk_size {
                    ranges.pop();
                    if let Some(prev) = ranges.last_mut() {
                        prev.1 = tail_end;
                    }
                }
            }
        }

        ranges
    }
}
