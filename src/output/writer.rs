//! Parquet file writer
//!
//! The query result is exported by DuckDB into a temporary file next to the
//! destination and then renamed over it, so the destination only ever holds
//! a complete file.

use super::summary::{summarize_parquet, ParquetSummary};
use crate::database::DatabaseEngine;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Temporary sibling of `path` used while the export runs
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Execute `query` and write its result to `output_path` as Parquet
///
/// Any existing file at `output_path` is replaced. On failure the temporary
/// file is removed and the destination is left untouched.
pub fn write_parquet(
    engine: &DatabaseEngine,
    query: &str,
    output_path: &Path,
) -> Result<ParquetSummary> {
    let temp_path = temp_path_for(output_path);
    remove_if_exists(&temp_path)?;

    if let Err(e) = engine.copy_to_parquet(query, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, output_path).map_err(|e| {
        Error::output(format!(
            "Failed to move {} to {}: {e}",
            temp_path.display(),
            output_path.display()
        ))
    })?;

    let summary = summarize_parquet(output_path)?;
    tracing::debug!(
        path = %output_path.display(),
        rows = summary.num_rows,
        bytes = summary.size_bytes,
        "Wrote Parquet file"
    );

    Ok(summary)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::output(format!(
            "Failed to remove stale {}: {e}",
            path.display()
        ))),
    }
}
