//! Query engine support via DuckDB
//!
//! This module wraps an in-memory DuckDB connection that exposes the input
//! files as a single view and answers the schema, key and export queries the
//! pipeline needs.

mod engine;

pub use engine::DatabaseEngine;
