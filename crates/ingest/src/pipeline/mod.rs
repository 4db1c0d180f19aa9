//! Single-document orchestration: read, extract, normalize, chunk,
//! recognize people, assemble.

pub mod assemble;
pub mod batch;
pub mod persist;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use folio_core::{DocumentResult, ExtractionError, PipelineConfig, PipelineError, ProcessingInfo};

use crate::document::chunker::{ChunkConfig, Chunker};
use crate::document::extract_pdf;
use crate::document::metadata::{extract_metadata, SourceFile};
use crate::entity::{LazyRecognizer, PersonExtractor};

pub use assemble::{assemble, Assembly};
pub use batch::{BatchReport, BatchRunner, BatchSummary, DocumentOutcome};
pub use persist::{read_json, write_json, write_json_with};

/// Turns one PDF into a `DocumentResult`. Cheap to clone and safe to share
/// between worker threads; the person model behind it is loaded once.
#[derive(Debug, Clone)]
pub struct Pipeline {
    chunker: Chunker,
    extractor: PersonExtractor,
    processor_version: String,
}

impl Pipeline {
    /// Validates `config` before anything runs.
    pub fn new(config: &PipelineConfig, extractor: PersonExtractor) -> Result<Self, PipelineError> {
        config.validate()?;
        let chunker = Chunker::new(ChunkConfig::from(config))?;
        Ok(Self {
            chunker,
            extractor,
            processor_version: config.processor_version.clone(),
        })
    }

    /// Pipeline whose person model comes from `config.entity_model`, or the
    /// bundled model when unset.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let recognizer = LazyRecognizer::from_path(config.entity_model.as_deref());
        Self::new(config, PersonExtractor::new(Arc::new(recognizer)))
    }

    pub fn chunk_config(&self) -> &ChunkConfig {
        self.chunker.config()
    }

    pub fn extractor(&self) -> &PersonExtractor {
        &self.extractor
    }

    pub fn process(&self, path: &Path) -> Result<DocumentResult, PipelineError> {
        let source = SourceFile::read(path)?;
        self.process_source(&source)
    }

    /// Process a document already in memory. File-system dates are absent.
    pub fn process_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentResult, PipelineError> {
        self.process_source(&SourceFile::from_bytes(file_name, bytes))
    }

    /// Runs every stage for one document. A panic in any stage fails this
    /// document as `CORRUPT` and leaves the caller's thread running.
    fn process_source(&self, source: &SourceFile) -> Result<DocumentResult, PipelineError> {
        if source.bytes.is_empty() {
            return Err(PipelineError::DocumentUnreadable {
                path: source.path.display().to_string(),
                message: "file is empty".to_string(),
            });
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_stages(source)));
        outcome.unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(
                file = %source.file_name,
                panic = %message,
                "document processing panicked"
            );
            Err(ExtractionError::corrupt(format!("processing panicked: {message}")).into())
        })
    }

    fn run_stages(&self, source: &SourceFile) -> Result<DocumentResult, PipelineError> {
        let started = Instant::now();

        // Metadata and text come from independent parses of the same bytes.
        let (metadata, extracted) =
            rayon::join(|| extract_metadata(source), || extract_pdf(&source.bytes));
        let extracted = extracted?;

        if extracted.is_blank() {
            tracing::info!(file = %source.file_name, "no extractable text");
        }
        let normalized = extracted.normalize();
        let chunks = self.chunker.split(&normalized);
        let people = self.extractor.extract(&normalized.text);

        let config = self.chunker.config();
        let processing_info = ProcessingInfo {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            min_chunk_size: config.min_chunk_size,
            processing_date: Utc::now(),
            processor_version: self.processor_version.clone(),
            warnings: people.warning.into_iter().collect(),
        };

        let result = assemble(Assembly {
            metadata,
            chunks,
            people: people.people,
            processing_info,
            content_hash: source.content_hash(),
        })?;

        tracing::info!(
            file = %source.file_name,
            pages = result.metadata.page_count,
            chunks = result.document_info.total_chunks,
            people = result.people_mentioned.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "document processed"
        );
        Ok(result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
