//! Parquet readback
//!
//! Provides utilities for inspecting a written Parquet file with the
//! `parquet` crate's Arrow reader.

use crate::error::{Result, ResultExt};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Facts about a Parquet file taken from its footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParquetSummary {
    /// File location
    pub path: PathBuf,
    /// Total number of rows
    pub num_rows: u64,
    /// Top-level column names in file order
    pub columns: Vec<String>,
    /// Number of row groups
    pub row_groups: usize,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Summarize a Parquet file without reading its data pages
pub fn summarize_parquet(path: impl AsRef<Path>) -> Result<ParquetSummary> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let size_bytes = file.metadata()?.len();

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let metadata = builder.metadata();
    let columns = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    Ok(ParquetSummary {
        path: path.to_path_buf(),
        num_rows: metadata.file_metadata().num_rows() as u64,
        columns,
        row_groups: metadata.num_row_groups(),
        size_bytes,
    })
}

/// Read every row of a Parquet file into RecordBatches
pub fn read_parquet_batches(path: impl AsRef<Path>) -> Result<Vec<RecordBatch>> {
    let file = File::open(path.as_ref())?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}
