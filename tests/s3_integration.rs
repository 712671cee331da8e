//! Preflight and normalization tests against a live S3 bucket
//!
//! These tests require real credentials.
//! Set BUCKET_NAME, S3_INPUT_DATA_PATH, AWS_REGION, AWS_ACCESS_KEY_ID and
//! AWS_SECRET_ACCESS_KEY to run. NORMALIZED_DATA_DIR defaults to a temp dir.

use parquet_normalize::config::{BUCKET_NAME, NORMALIZED_DATA_DIR};
use parquet_normalize::storage::run_preflight;
use parquet_normalize::{NormalizeConfig, Normalizer};

/// Load the S3 configuration from the environment or skip
fn s3_config(output_dir: &std::path::Path) -> Option<NormalizeConfig> {
    std::env::var(BUCKET_NAME).ok()?;

    let output = output_dir.display().to_string();
    let config = NormalizeConfig::from_lookup(|name| {
        if name == NORMALIZED_DATA_DIR {
            std::env::var(name).ok().or_else(|| Some(output.clone()))
        } else {
            std::env::var(name).ok()
        }
    });

    match config {
        Ok(config) if config.input.is_remote() => Some(config),
        Ok(_) => None,
        Err(e) => panic!("BUCKET_NAME is set but configuration is invalid: {e}"),
    }
}

#[tokio::test]
async fn test_s3_preflight() {
    let dir = tempfile::tempdir().unwrap();
    let Some(config) = s3_config(dir.path()) else {
        println!("Skipping: {BUCKET_NAME} not set");
        return;
    };

    let outcomes = run_preflight(&config).await;
    for outcome in &outcomes {
        println!("{}: {} ({})", outcome.check, outcome.passed, outcome.message);
    }
    assert!(outcomes.iter().all(|o| o.passed), "{outcomes:?}");
}

#[test]
fn test_s3_normalize() {
    let dir = tempfile::tempdir().unwrap();
    let Some(config) = s3_config(dir.path()) else {
        println!("Skipping: {BUCKET_NAME} not set");
        return;
    };

    let normalizer = Normalizer::new(config).unwrap();
    let report = normalizer.run().unwrap();

    println!(
        "Wrote {} rows, {} columns ({} flattened) to {}",
        report.output.num_rows,
        report.output.columns.len(),
        report.flattened_columns.len(),
        report.output.path.display()
    );
    assert!(report.output.path.exists());
}
