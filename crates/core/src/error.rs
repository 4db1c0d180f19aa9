use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Extraction ────────────────────────────────────────────────

/// Why a document's text could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionReason {
    Encrypted,
    Corrupt,
}

impl ExtractionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionReason::Encrypted => "ENCRYPTED",
            ExtractionReason::Corrupt => "CORRUPT",
        }
    }
}

impl fmt::Display for ExtractionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("text extraction failed ({reason}): {message}")]
pub struct ExtractionError {
    pub reason: ExtractionReason,
    pub message: String,
}

impl ExtractionError {
    pub fn encrypted(message: impl Into<String>) -> Self {
        Self {
            reason: ExtractionReason::Encrypted,
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self {
            reason: ExtractionReason::Corrupt,
            message: message.into(),
        }
    }
}

// ── Configuration ─────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("chunk_overlap must be greater than zero")]
    ZeroOverlap,

    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },

    #[error("min_chunk_size must be between 1 and chunk_size ({size}), got {min}")]
    MinChunkSize { min: usize, size: usize },

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

// ── Pipeline ──────────────────────────────────────────────────

/// Fatal failure while turning one document into a `DocumentResult`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("document unreadable: {path}: {message}")]
    DocumentUnreadable { path: String, message: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("inconsistent result: {0}")]
    Inconsistent(String),

    #[error("failed to persist {path}: {message}")]
    Persist { path: String, message: String },
}

impl PipelineError {
    /// Machine-readable reason code, stable across releases.
    pub fn reason_code(&self) -> &'static str {
        match self {
            PipelineError::DocumentUnreadable { .. } => "DOCUMENT_UNREADABLE",
            PipelineError::Extraction(e) => e.reason.as_str(),
            PipelineError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            PipelineError::Inconsistent(_) => "INCONSISTENT_RESULT",
            PipelineError::Persist { .. } => "PERSIST",
        }
    }
}
