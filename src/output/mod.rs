//! Output module
//!
//! Writes the normalized dataset and reads the result back.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing a query result to a single Parquet file, replacing any old one
//! - Summarizing a Parquet file from its footer (rows, columns, size)
//! - Reading a Parquet file back into Arrow RecordBatches

mod summary;
mod writer;

pub use summary::{read_parquet_batches, summarize_parquet, ParquetSummary};
pub use writer::{temp_path_for, write_parquet};

#[cfg(test)]
mod tests;
