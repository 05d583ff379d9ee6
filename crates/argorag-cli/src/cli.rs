use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// argorag - ARGO float profile ingestion and retrieval
#[derive(Parser, Debug)]
#[command(name = "argorag")]
#[command(about = "ARGO float profile ingestion and retrieval", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, parse, and normalize profiles from the float index
    Ingest(IngestArgs),

    /// Bulk-load normalized profiles into PostgreSQL
    Load(LoadArgs),

    /// Build the semantic index over stored summaries
    Index(IndexArgs),

    /// Ask a natural-language question against the stores
    Ask(AskArgs),

    /// Show store and index statistics
    Status(StatusArgs),
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Master index file to ingest (defaults to the configured path)
    #[arg(long)]
    pub index_path: Option<PathBuf>,

    /// Process at most this many index entries
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Flattened dataset to load (defaults to the configured path)
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct IndexArgs {}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question text
    pub question: String,

    /// Use semantic (nearest-neighbor) retrieval instead of SQL translation
    #[arg(long)]
    pub semantic: bool,

    /// Number of results for semantic retrieval
    #[arg(long, short = 'k', default_value = "5")]
    pub top_k: usize,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {}
