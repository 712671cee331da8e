//! Tests for output module

use super::*;
use crate::database::DatabaseEngine;
use arrow::array::{Array, Int32Array};
use std::path::Path;
use tempfile::tempdir;

// ============================================================================
// Temp Path Tests
// ============================================================================

#[test]
fn test_temp_path_for() {
    let path = Path::new("/data/out/normalized.parquet");
    assert_eq!(
        temp_path_for(path),
        Path::new("/data/out/normalized.parquet.tmp")
    );
}

// ============================================================================
// Parquet Writer Tests
// ============================================================================

#[test]
fn test_write_parquet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("normalized.parquet");
    let engine = DatabaseEngine::open().unwrap();

    let summary = write_parquet(
        &engine,
        "SELECT range::INTEGER AS id, 'x' AS label FROM range(5)",
        &path,
    )
    .unwrap();

    assert_eq!(summary.num_rows, 5);
    assert_eq!(summary.columns, vec!["id", "label"]);
    assert!(summary.size_bytes > 0);
    assert!(path.exists());
    assert!(!temp_path_for(&path).exists());
}

#[test]
fn test_write_parquet_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("normalized.parquet");
    std::fs::write(&path, b"not parquet").unwrap();
    let engine = DatabaseEngine::open().unwrap();

    let summary = write_parquet(&engine, "SELECT 42::INTEGER AS answer", &path).unwrap();
    assert_eq!(summary.num_rows, 1);

    let batches = read_parquet_batches(&path).unwrap();
    let answers = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(answers.value(0), 42);
}

#[test]
fn test_write_parquet_failure_leaves_destination() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("normalized.parquet");
    std::fs::write(&path, b"previous").unwrap();
    let engine = DatabaseEngine::open().unwrap();

    let result = write_parquet(&engine, "SELECT * FROM missing_table", &path);

    assert!(result.is_err());
    assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    assert!(!temp_path_for(&path).exists());
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summarize_missing_file() {
    let dir = tempdir().unwrap();
    let err = summarize_parquet(dir.path().join("nope.parquet")).unwrap_err();
    assert!(err.to_string().starts_with("Failed to open"));
    assert!(err.to_string().contains("nope.parquet"));
}

#[test]
fn test_read_parquet_batches_with_nulls() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nulls.parquet");
    let engine = DatabaseEngine::open().unwrap();

    write_parquet(
        &engine,
        "SELECT * FROM (VALUES (1::INTEGER), (NULL::INTEGER)) AS t(v)",
        &path,
    )
    .unwrap();

    let batches = read_parquet_batches(&path).unwrap();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 2);
    assert_eq!(batches[0].column(0).null_count(), 1);
}
