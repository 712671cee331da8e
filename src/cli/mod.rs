//! CLI module
//!
//! Command-line interface for the normalizer.
//!
//! # Commands
//!
//! - `normalize` - Flatten MAP columns and write `normalized.parquet` (default)
//! - `inspect` - Show schema, map keys and the generated SQL without writing
//! - `check` - Validate configuration and input storage preconditions

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
