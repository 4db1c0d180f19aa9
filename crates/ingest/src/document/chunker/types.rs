//! Chunk configuration and output types.

use folio_core::config::{
    derived_min_chunk_size, validate_chunking, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_MIN_CHUNK_SIZE,
};
use folio_core::{ConfigError, PipelineConfig};
use serde::Serialize;

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking engine. All sizes are in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 1000).
    pub chunk_size: usize,
    /// Characters repeated between adjacent chunks (default: 200).
    pub chunk_overlap: usize,
    /// Minimum characters for a trailing chunk; shorter tails merge into
    /// their predecessor (default: 100).
    pub min_chunk_size: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }
}

impl ChunkConfig {
    /// Size and overlap with a minimum derived from the size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            min_chunk_size: derived_min_chunk_size(chunk_size),
        }
    }

    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chunking(self.chunk_size, self.chunk_overlap, self.min_chunk_size)
    }
}

impl From<&PipelineConfig> for ChunkConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            min_chunk_size: config.min_chunk_size,
        }
    }
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// A chunk of normalized text with its position in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 0-based index within the document.
    pub index: usize,
    /// `chunk_<index>`.
    pub chunk_id: String,
    /// The chunk text content.
    pub content: String,
    /// Half-open character range in the normalized text.
    pub char_start: usize,
    pub char_end: usize,
    /// 1-based pages holding the first and last character.
    pub page_start: usize,
    pub page_end: usize,
    pub word_count: usize,
    pub char_count: usize,
}

pub fn chunk_id(index: usize) -> String {
    format!("chunk_{index}")
}
