use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use folio_core::config::derived_min_chunk_size;
use folio_core::PipelineConfig;

/// Batch PDF processor.
///
/// Extracts metadata, overlapping text chunks and the people mentioned in
/// each document, and writes one JSON record per document.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Chunk PDFs and extract metadata and people")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/folio/config.toml)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process PDF files, or directories of PDF files
    Process(ProcessArgs),
    /// Normalize and chunk plain text from a file or stdin
    Chunk(ChunkArgs),
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// PDF files or directories
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Write `<name>.json` per document here instead of printing to stdout
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(long, short = 'r')]
    pub recursive: bool,

    #[command(flatten)]
    pub chunking: ChunkingArgs,

    /// Documents processed in parallel
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Person-name model file (uses the bundled model if not set)
    #[arg(long)]
    pub entity_model: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

impl ProcessArgs {
    /// Flags win over file and environment settings.
    pub fn apply(&self, config: &mut PipelineConfig) {
        self.chunking.apply(config);
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        if let Some(path) = &self.entity_model {
            config.entity_model = Some(path.clone());
        }
    }
}

#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Text file to chunk (reads stdin if not set)
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub chunking: ChunkingArgs,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug, Default)]
pub struct ChunkingArgs {
    /// Target chunk length in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared between adjacent chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Trailing chunks shorter than this merge into the previous one
    #[arg(long)]
    pub min_chunk_size: Option<usize>,
}

impl ChunkingArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        match (self.min_chunk_size, self.chunk_size) {
            (Some(min), _) => config.min_chunk_size = min,
            (None, Some(size)) => config.min_chunk_size = derived_min_chunk_size(size),
            (None, None) => {}
        }
    }
}
