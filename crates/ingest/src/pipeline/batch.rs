//! Bounded-parallel processing of many documents.
//!
//! Each document runs on its own worker. A failure is recorded against that
//! document and never cancels the others. Results come back in input order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use folio_core::{ConfigError, DocumentFailure, DocumentResult, PipelineError};

use super::persist::write_json_with;
use super::Pipeline;

/// What happened to one input path.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub result: Result<DocumentResult, DocumentFailure>,
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every outcome of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

/// Serializable batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    pub fn successes(&self) -> impl Iterator<Item = &DocumentResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentFailure> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn succeeded(&self) -> usize {
        self.successes().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            succeeded: self.succeeded(),
            failed: self.failed(),
            failures: self.failures().cloned().collect(),
        }
    }
}

/// Runs a shared `Pipeline` over many files on a fixed-size worker pool.
pub struct BatchRunner {
    pipeline: Pipeline,
    pool: rayon::ThreadPool,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(pipeline: Pipeline, concurrency: usize) -> Result<Self, PipelineError> {
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency.into());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|i| format!("folio-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::WorkerPool(e.to_string()))?;
        Ok(Self {
            pipeline,
            pool,
            concurrency,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Process every path and keep results in memory.
    pub fn run(&self, paths: &[PathBuf]) -> BatchReport {
        self.run_with(paths, |_, _, _| Ok(()))
    }

    /// Process every path and write each success to
    /// `<output_dir>/<file stem>.json`. Inputs sharing a stem get `-1`,
    /// `-2`, ... suffixes in input order. A write failure turns that
    /// document into a `PERSIST` failure.
    pub fn run_to_dir(&self, paths: &[PathBuf], output_dir: &Path, pretty: bool) -> BatchReport {
        let names = output_names(paths);
        self.run_with(paths, |i, _, result| {
            write_json_with(result, &output_dir.join(&names[i]), pretty)
        })
    }

    fn run_with<F>(&self, paths: &[PathBuf], sink: F) -> BatchReport
    where
        F: Fn(usize, &Path, &DocumentResult) -> Result<(), PipelineError> + Sync,
    {
        tracing::info!(
            documents = paths.len(),
            concurrency = self.concurrency,
            "batch started"
        );

        let outcomes: Vec<DocumentOutcome> = self.pool.install(|| {
            paths
                .par_iter()
                .enumerate()
                .map(|(i, path)| {
                    let result = self
                        .pipeline
                        .process(path)
                        .and_then(|r| sink(i, path.as_path(), &r).map(|_| r))
                        .map_err(|e| failure(path, &e));
                    DocumentOutcome {
                        path: path.clone(),
                        result,
                    }
                })
                .collect()
        });

        let report = BatchReport { outcomes };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("pipeline", &self.pipeline)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

fn failure(path: &Path, err: &PipelineError) -> DocumentFailure {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    tracing::warn!(file = %file_name, reason = err.reason_code(), error = %err, "document failed");
    DocumentFailure {
        file_name,
        reason: err.reason_code().to_string(),
        message: err.to_string(),
    }
}

/// One `<stem>.json` name per input, unique within the batch. Comparison ignores
/// case so names stay distinct on case-insensitive file systems.
pub fn output_names(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = stem_of(path);
            let mut name = format!("{stem}.json");
            let mut suffix = 1;
            while !taken.insert(name.to_lowercase()) {
                name = format!("{stem}-{suffix}.json");
                suffix += 1;
            }
            name
        })
        .collect()
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
