//! PDF ingestion: extraction, normalization, chunking, person-name
//! recognition and result assembly.

pub mod document;
pub mod entity;
pub mod pipeline;

pub use document::chunker::{Chunk, ChunkConfig, Chunker};
pub use entity::{LazyRecognizer, PersonExtractor, PersonRecognizer};
pub use pipeline::{BatchReport, BatchRunner, DocumentOutcome, Pipeline};
