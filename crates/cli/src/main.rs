mod cli;
mod config;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use folio_core::config::load_dotenv;
use folio_ingest::document::extract_txt;
use folio_ingest::{BatchRunner, ChunkConfig, Chunker, Pipeline};

use crate::cli::{ChunkArgs, CliArgs, Command, ProcessArgs};
use crate::config::CliConfig;

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    match args.command {
        Command::Process(process) => run_process(process, &config),
        Command::Chunk(chunk) => run_chunk(chunk, &config),
    }
}

// ── process ─────────────────────────────────────────────────────────

fn run_process(args: ProcessArgs, config: &CliConfig) -> Result<ExitCode> {
    let mut pipeline_config = config.pipeline_with_env()?;
    args.apply(&mut pipeline_config);
    pipeline_config
        .validate()
        .context("invalid pipeline configuration")?;
    pipeline_config.log_summary();

    let inputs = collect_inputs(&args.paths, args.recursive);
    if inputs.is_empty() {
        anyhow::bail!("no PDF files found");
    }
    info!(documents = inputs.len(), "Collected inputs");

    let pipeline = Pipeline::from_config(&pipeline_config)?;
    if let Err(e) = pipeline.extractor().warm_up() {
        warn!(error = %e, "Person model unavailable, results will carry no names");
    }
    let runner = BatchRunner::new(pipeline, pipeline_config.concurrency)?;
    let pretty = !(args.compact || config.compact);

    let output_dir = args.output_dir.as_ref().or(config.output_dir.as_ref());
    let report = match output_dir {
        Some(dir) => {
            let report = runner.run_to_dir(&inputs, dir, pretty);
            print_json(&report.summary(), pretty)?;
            report
        }
        None => {
            let report = runner.run(&inputs);
            let results: Vec<_> = report.successes().collect();
            match results.as_slice() {
                [single] if inputs.len() == 1 => print_json(single, pretty)?,
                _ => print_json(&results, pretty)?,
            }
            for failure in report.failures() {
                warn!(
                    file = %failure.file_name,
                    reason = %failure.reason,
                    "{}",
                    failure.message
                );
            }
            report
        }
    };

    runner.pipeline().extractor().teardown();
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Done"
    );
    Ok(if report.failed() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Expand directories to the PDF files inside them. Explicit file paths are
/// kept as given so a missing or misnamed file is reported per document.
fn collect_inputs(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    for path in paths {
        if !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }
        let max_depth = if recursive { usize::MAX } else { 1 };
        for entry in WalkDir::new(path).max_depth(max_depth).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_pdf(entry.path()) => {
                    inputs.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Skipping unreadable directory entry"),
            }
        }
    }
    inputs
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

// ── chunk ───────────────────────────────────────────────────────────

fn run_chunk(args: ChunkArgs, config: &CliConfig) -> Result<ExitCode> {
    let mut pipeline_config = config.pipeline_with_env()?;
    args.chunking.apply(&mut pipeline_config);
    let chunker = Chunker::new(ChunkConfig::from(&pipeline_config))
        .context("invalid chunking configuration")?;

    let bytes = match &args.file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let normalized = extract_txt(&bytes).normalize();
    let chunks = chunker.split(&normalized);
    info!(chunks = chunks.len(), chars = normalized.char_len(), "Chunked text");
    print_json(&chunks, !(args.compact || config.compact))?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}
