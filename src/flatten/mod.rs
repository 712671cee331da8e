//! Flattening query builder
//!
//! Turns the inspected schema plus the keys found in every map column into a
//! single projection over the input view.
//!
//! # Overview
//!
//! - Every input column is kept (`*`)
//! - Each `(map column, key)` pair adds a column named `{column}_{key}`
//! - A pair whose name is already taken by an input column is coalesced into
//!   that column in place, keeping its non-null values

mod builder;

pub use builder::{FlattenPlan, FlattenedColumn};
