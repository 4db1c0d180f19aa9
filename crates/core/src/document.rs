//! Interchange records for a processed document.
//!
//! Field names and nesting are the JSON contract read by downstream indexers,
//! so renames here are breaking changes.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chunking method recorded in each chunk's provenance block.
pub const CHUNK_METHOD: &str = "recursive_character";

// ── Metadata ──────────────────────────────────────────────────

/// File-system and document-level attributes of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub page_count: usize,
    /// ISO-8601; `null` when neither the document nor the file system knows.
    pub created_date: Option<String>,
    pub modified_date: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub producer: Option<String>,
}

// ── Chunks ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPosition {
    pub index: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkProvenance {
    pub chunk_method: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub chunk_id: String,
    /// 1-based page the chunk starts on.
    pub page_number: usize,
    /// 1-based page the chunk ends on; differs from `page_number` when a
    /// chunk crosses a page break.
    pub page_end: usize,
    pub word_count: usize,
    pub char_count: usize,
    /// Half-open character range into the normalized document text.
    pub char_start: usize,
    pub char_end: usize,
    pub chunk_position: ChunkPosition,
    /// Document-level people whose names occur inside this chunk.
    pub people_mentioned: Vec<String>,
    pub chunk_size_bytes: usize,
    /// Characters shared with the following chunk.
    pub overlap_with_next: usize,
    pub processing_info: ChunkProvenance,
}

/// One chunk as written to the interchange format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub content: String,
    pub chunk_metadata: ChunkMetadata,
    pub chunk_id: String,
    pub word_count: usize,
    pub char_count: usize,
}

// ── Summary ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub total_pages: usize,
    pub filename: String,
    pub total_chunks: usize,
    pub file_size_bytes: u64,
    pub created_date: Option<String>,
    pub modified_date: Option<String>,
    /// Lowercase hex SHA-256 of the source bytes.
    pub content_hash: String,
    pub total_word_count: usize,
    pub total_char_count: usize,
    pub average_chunk_size: f64,
}

/// Configuration snapshot recorded for reproducibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
    pub processing_date: DateTime<Utc>,
    pub processor_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ── Result ────────────────────────────────────────────────────

/// Everything extracted from one document. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub metadata: DocumentMetadata,
    pub chunks: Vec<ChunkRecord>,
    pub document_info: DocumentInfo,
    /// Lower-cased, de-duplicated person names.
    pub people_mentioned: BTreeSet<String>,
    pub processing_info: ProcessingInfo,
}

// ── Batch ─────────────────────────────────────────────────────

/// Per-document failure recorded by a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub file_name: String,
    pub reason: String,
    pub message: String,
}
