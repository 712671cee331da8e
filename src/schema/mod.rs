//! Schema inspection module
//!
//! Describes the columns of the unioned input view and picks out the ones
//! that hold key-value maps.
//!
//! # Overview
//!
//! - **Columns**: ordered `(name, declared type)` pairs as reported by DuckDB
//! - **Map detection**: a column is map-typed when its type starts with `MAP`
//! - **Lookup**: case-insensitive, the way DuckDB resolves identifiers

mod types;

pub use types::{ColumnInfo, MapColumn, TableSchema};
