// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # parquet-normalize
//!
//! Reads a Parquet dataset (S3 or a local directory), finds the columns
//! holding key-value maps, flattens every observed key into its own scalar
//! column and writes the result as one `normalized.parquet` file.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parquet_normalize::{NormalizeConfig, Normalizer, Result};
//!
//! fn main() -> Result<()> {
//!     // NORMALIZED_DATA_DIR, AWS_REGION, AWS_ACCESS_KEY_ID,
//!     // AWS_SECRET_ACCESS_KEY, BUCKET_NAME, S3_INPUT_DATA_PATH
//!     let config = NormalizeConfig::from_env()?;
//!
//!     let normalizer = Normalizer::new(config)?;
//!     let report = normalizer.run()?;
//!     println!("flattened: {:?}", report.flattened_columns);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! config ─► view (read_parquet, union_by_name) ─► DESCRIBE ─► map_keys per MAP column
//!                                                                    │
//!              normalized.parquet ◄── COPY ... TO ◄── SELECT *, col_key ...
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and constants
pub mod types;

/// Environment configuration
pub mod config;

/// SQL quoting helpers
pub mod sql;

/// Schema inspection
pub mod schema;

/// DuckDB query engine
pub mod database;

/// Flattening query builder
pub mod flatten;

/// Parquet output
pub mod output;

/// Input storage access and preflight checks
pub mod storage;

/// Normalization pipeline
pub mod normalize;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{InputSource, NormalizeConfig, S3Settings};
pub use error::{Error, Result};
pub use flatten::{FlattenPlan, FlattenedColumn};
pub use normalize::{NormalizeReport, Normalizer};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
