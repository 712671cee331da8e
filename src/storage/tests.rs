//! Tests for storage module

use super::*;
use crate::config::{InputSource, NormalizeConfig, S3Settings};
use crate::types::InputFormat;
use tempfile::tempdir;
use test_case::test_case;

// ============================================================================
// Listing Prefix Tests
// ============================================================================

#[test_case("exports/data", "exports/data" ; "plain prefix")]
#[test_case("/exports/data/", "exports/data" ; "slashes trimmed")]
#[test_case("exports/*/part-*.parquet", "exports" ; "glob")]
#[test_case("*.parquet", "" ; "root glob")]
#[test_case("exports/2024/cur.parquet", "exports/2024" ; "single file")]
fn test_listing_prefix(path: &str, expected: &str) {
    assert_eq!(listing_prefix(path, "parquet"), expected);
}

// ============================================================================
// Glob Tests
// ============================================================================

#[test_case("exports/*.parquet", "exports/a.parquet", true ; "direct child")]
#[test_case("exports/*.parquet", "exports/BILLING_PERIOD=2024-01/a.parquet", false ; "star stays in segment")]
#[test_case("exports/*/*.parquet", "exports/BILLING_PERIOD=2024-01/a.parquet", true ; "one level down")]
#[test_case("exports/**/*.parquet", "exports/a.parquet", true ; "double star zero levels")]
#[test_case("exports/**/*.parquet", "exports/y=2024/m=01/a.parquet", true ; "double star many levels")]
#[test_case("exports/part-?.parquet", "exports/part-1.parquet", true ; "question mark")]
#[test_case("exports/part-[!0].parquet", "exports/part-0.parquet", false ; "negated class")]
#[test_case("exports/one.parquet", "exports/one_parquet", false ; "dot is literal")]
#[test_case("*.csv", "costs.csv", true ; "local pattern")]
fn test_glob_to_regex(pattern: &str, path: &str, expected: bool) {
    assert_eq!(glob_to_regex(pattern).unwrap().is_match(path), expected);
}

// ============================================================================
// Location Tests
// ============================================================================

#[test]
fn test_local_location() {
    let dir = tempdir().unwrap();
    let source = InputSource::Local {
        dir: dir.path().to_path_buf(),
    };

    let location = InputLocation::from_source(&source, InputFormat::Parquet).unwrap();
    assert_eq!(location.prefix(), "");
    assert_eq!(location.pattern(), "*.parquet");
}

#[test]
fn test_s3_location_builds_without_network() {
    let source = InputSource::S3(S3Settings {
        region: "us-east-1".to_string(),
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: "secret".to_string(),
        bucket: "cost-reports".to_string(),
        input_path: "exports/*.parquet".to_string(),
        endpoint: Some("http://localhost:9000".to_string()),
    });

    let location = InputLocation::from_source(&source, InputFormat::Parquet).unwrap();
    assert_eq!(location.pattern(), "exports/*.parquet");
    assert_eq!(location.prefix(), "exports");
    assert_eq!(location.url(), "s3://cost-reports/exports");
}

// ============================================================================
// Preflight Tests
// ============================================================================

#[tokio::test]
async fn test_preflight_passes_with_parquet_files() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("part-0.parquet"), b"PAR1").unwrap();
    std::fs::write(input.path().join("README.md"), b"docs").unwrap();

    let config = NormalizeConfig::local(input.path(), output.path()).unwrap();
    let outcomes = run_preflight(&config).await;

    let checks: Vec<&str> = outcomes.iter().map(|o| o.check.as_str()).collect();
    assert_eq!(checks, vec!["input_location", "input_objects", "input_files"]);
    assert!(outcomes.iter().all(|o| o.passed), "{outcomes:?}");
    assert!(outcomes[2].message.contains("Found 1 file(s) matching *.parquet"));
}

#[tokio::test]
async fn test_preflight_empty_directory() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    let config = NormalizeConfig::local(input.path(), output.path()).unwrap();
    let outcomes = run_preflight(&config).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].passed);
    assert!(!outcomes[1].passed);
    assert_eq!(outcomes[1].check, "input_objects");
}

#[tokio::test]
async fn test_preflight_wrong_file_type() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("part-0.parquet"), b"PAR1").unwrap();

    let config = NormalizeConfig::local(input.path(), output.path())
        .unwrap()
        .with_input_format(InputFormat::Csv);
    let outcomes = run_preflight(&config).await;

    let last = outcomes.last().unwrap();
    assert_eq!(last.check, "input_files");
    assert!(!last.passed);
    assert!(last.message.contains("No files of type csv"));
}

#[tokio::test]
async fn test_preflight_ignores_nested_files() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let nested = input.path().join("BILLING_PERIOD=2024-01");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(nested.join("part-0.parquet"), b"PAR1").unwrap();

    let config = NormalizeConfig::local(input.path(), output.path()).unwrap();
    let outcomes = run_preflight(&config).await;

    let checks: Vec<&str> = outcomes.iter().map(|o| o.check.as_str()).collect();
    assert_eq!(checks, vec!["input_location", "input_objects", "input_files"]);
    assert!(outcomes[1].passed);
    assert!(!outcomes[2].passed);
    assert!(outcomes[2].message.contains("No files of type parquet match *.parquet"));
}
