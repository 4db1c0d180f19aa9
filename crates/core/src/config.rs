use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 100;
pub const PROCESSOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_parse<T: FromStr>(profile: &str, key: &str) -> Result<Option<T>, ConfigError> {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

/// Checks the chunking triple shared by every component that cuts text.
pub fn validate_chunking(
    chunk_size: usize,
    chunk_overlap: usize,
    min_chunk_size: usize,
) -> Result<(), ConfigError> {
    if chunk_size == 0 {
        return Err(ConfigError::ZeroChunkSize);
    }
    if chunk_overlap == 0 {
        return Err(ConfigError::ZeroOverlap);
    }
    if chunk_overlap >= chunk_size {
        return Err(ConfigError::OverlapTooLarge {
            overlap: chunk_overlap,
            size: chunk_size,
        });
    }
    if min_chunk_size == 0 || min_chunk_size > chunk_size {
        return Err(ConfigError::MinChunkSize {
            min: min_chunk_size,
            size: chunk_size,
        });
    }
    Ok(())
}

/// Default minimum chunk length for a given target size: a tenth of it,
/// capped at the stock 100 characters.
pub fn derived_min_chunk_size(chunk_size: usize) -> usize {
    (chunk_size / 10).clamp(1, DEFAULT_MIN_CHUNK_SIZE)
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// ── Pipeline config ───────────────────────────────────────────

/// Every recognized pipeline option with its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Active profile name (empty = default).
    #[serde(skip)]
    pub profile: String,
    /// Target chunk length in characters.
    pub chunk_size: usize,
    /// Characters repeated between adjacent chunks.
    pub chunk_overlap: usize,
    /// Trailing chunks shorter than this are merged backwards.
    pub min_chunk_size: usize,
    /// Worker threads for batch runs.
    pub concurrency: usize,
    /// Person-name model file; the bundled model is used when unset.
    pub entity_model: Option<PathBuf>,
    pub processor_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            concurrency: default_concurrency(),
            entity_model: None,
            processor_version: PROCESSOR_VERSION.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `FOLIO_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay_env()
    }

    /// Apply environment overrides on top of `self`.
    pub fn overlay_env(self) -> Result<Self, ConfigError> {
        let profile = env_or("FOLIO_PROFILE", "").to_uppercase();
        self.overlay_profile(&profile)
    }

    /// Apply overrides for a specific named profile (empty string = default).
    pub fn overlay_profile(mut self, profile: &str) -> Result<Self, ConfigError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        self.profile = p.to_string();

        let size: Option<usize> = profiled_env_parse(p, "FOLIO_CHUNK_SIZE")?;
        if let Some(size) = size {
            self.chunk_size = size;
        }
        if let Some(overlap) = profiled_env_parse(p, "FOLIO_CHUNK_OVERLAP")? {
            self.chunk_overlap = overlap;
        }
        match profiled_env_parse(p, "FOLIO_MIN_CHUNK_SIZE")? {
            Some(min) => self.min_chunk_size = min,
            None if size.is_some() => self.min_chunk_size = derived_min_chunk_size(self.chunk_size),
            None => {}
        }
        if let Some(n) = profiled_env_parse(p, "FOLIO_CONCURRENCY")? {
            self.concurrency = n;
        }
        if let Some(path) = profiled_env_opt(p, "FOLIO_ENTITY_MODEL") {
            self.entity_model = Some(PathBuf::from(path));
        }
        if let Some(version) = profiled_env_opt(p, "FOLIO_PROCESSOR_VERSION") {
            self.processor_version = version;
        }
        Ok(self)
    }

    /// Fail fast on option combinations no stage can honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chunking(self.chunk_size, self.chunk_overlap, self.min_chunk_size)?;
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  chunking:    size={}, overlap={}, min={}",
            self.chunk_size,
            self.chunk_overlap,
            self.min_chunk_size
        );
        tracing::info!("  workers:     concurrency={}", self.concurrency);
        tracing::info!(
            "  entities:    model={}",
            self.entity_model
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(bundled)".to_string())
        );
        tracing::info!("  processor:   version={}", self.processor_version);
    }
}
