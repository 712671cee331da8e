//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flatten MAP columns of a Parquet dataset into scalar columns
#[derive(Parser, Debug)]
#[command(name = "parquet-normalize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Env file to load before reading configuration (default: ./.env if present)
    #[arg(short, long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Flatten MAP columns and write normalized.parquet
    Normalize,

    /// Show schema, map keys and the generated SQL without writing
    Inspect,

    /// Validate configuration and input storage preconditions
    Check,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
