//! Merge stage outputs into one `DocumentResult` and check it is coherent.

use std::collections::BTreeSet;

use folio_core::{
    ChunkMetadata, ChunkPosition, ChunkProvenance, ChunkRecord, DocumentInfo, DocumentMetadata,
    DocumentResult, PipelineError, ProcessingInfo, CHUNK_METHOD,
};

use crate::document::chunker::{chunk_id, Chunk};
use crate::entity::normalize_name;

/// Everything the assembler merges.
#[derive(Debug)]
pub struct Assembly {
    pub metadata: DocumentMetadata,
    pub chunks: Vec<Chunk>,
    pub people: BTreeSet<String>,
    pub processing_info: ProcessingInfo,
    pub content_hash: String,
}

/// Validate chunk bookkeeping, then build the interchange record. Any
/// mismatch fails the whole document; no partial result is returned.
pub fn assemble(input: Assembly) -> Result<DocumentResult, PipelineError> {
    let Assembly {
        metadata,
        chunks,
        people,
        processing_info,
        content_hash,
    } = input;

    validate_chunks(&chunks)?;

    let total_chunks = chunks.len();
    let records: Vec<ChunkRecord> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let overlap_with_next = chunks
                .get(i + 1)
                .map(|next| chunk.char_end.saturating_sub(next.char_start))
                .unwrap_or(0);
            to_record(chunk, total_chunks, overlap_with_next, &people, &processing_info)
        })
        .collect();

    let total_word_count: usize = records.iter().map(|r| r.word_count).sum();
    let total_char_count: usize = records.iter().map(|r| r.char_count).sum();
    let average_chunk_size = if total_chunks == 0 {
        0.0
    } else {
        total_char_count as f64 / total_chunks as f64
    };

    let document_info = DocumentInfo {
        total_pages: metadata.page_count,
        filename: metadata.file_name.clone(),
        total_chunks,
        file_size_bytes: metadata.file_size,
        created_date: metadata.created_date.clone(),
        modified_date: metadata.modified_date.clone(),
        content_hash,
        total_word_count,
        total_char_count,
        average_chunk_size,
    };

    Ok(DocumentResult {
        metadata,
        chunks: records,
        document_info,
        people_mentioned: people,
        processing_info,
    })
}

fn validate_chunks(chunks: &[Chunk]) -> Result<(), PipelineError> {
    for (i, chunk) in chunks.iter().enumerate() {
        let fail = |what: &str| {
            Err(PipelineError::Inconsistent(format!(
                "chunk {i} ({}): {what}",
                chunk.chunk_id
            )))
        };
        if chunk.index != i || chunk.chunk_id != chunk_id(i) {
            return fail("out of sequence");
        }
        if chunk.content.trim().is_empty() {
            return fail("empty content");
        }
        if chunk.char_count != chunk.content.chars().count()
            || chunk.char_end.checked_sub(chunk.char_start) != Some(chunk.char_count)
        {
            return fail("character count does not match content");
        }
        if chunk.word_count != chunk.content.split_whitespace().count() {
            return fail("word count does not match content");
        }
        if chunk.page_start == 0 || chunk.page_start > chunk.page_end {
            return fail("invalid page span");
        }
    }
    Ok(())
}

fn to_record(
    chunk: &Chunk,
    total_chunks: usize,
    overlap_with_next: usize,
    people: &BTreeSet<String>,
    info: &ProcessingInfo,
) -> ChunkRecord {
    ChunkRecord {
        content: chunk.content.clone(),
        chunk_id: chunk.chunk_id.clone(),
        word_count: chunk.word_count,
        char_count: chunk.char_count,
        chunk_metadata: ChunkMetadata {
            chunk_id: chunk.chunk_id.clone(),
            page_number: chunk.page_start,
            page_end: chunk.page_end,
            word_count: chunk.word_count,
            char_count: chunk.char_count,
            char_start: chunk.char_start,
            char_end: chunk.char_end,
            chunk_position: ChunkPosition {
                index: chunk.index,
                total_chunks,
            },
            people_mentioned: mentions_in(&chunk.content, people),
            chunk_size_bytes: chunk.content.len(),
            overlap_with_next,
            processing_info: ChunkProvenance {
                chunk_method: CHUNK_METHOD.to_string(),
                chunk_size: info.chunk_size,
                chunk_overlap: info.chunk_overlap,
            },
        },
    }
}

/// Document-level names that occur in `content` as whole words.
pub fn mentions_in(content: &str, people: &BTreeSet<String>) -> Vec<String> {
    if people.is_empty() {
        return Vec::new();
    }
    let haystack = normalize_name(content);
    people
        .iter()
        .filter(|name| contains_word_sequence(&haystack, name))
        .cloned()
        .collect()
}

fn contains_word_sequence(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
