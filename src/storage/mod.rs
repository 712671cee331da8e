//! Input storage module
//!
//! Object-store access to the input location, used by the `check` command to
//! confirm the preconditions the normalizer relies on before it runs.
//!
//! # Overview
//!
//! - S3 (or an S3-compatible endpoint) through `AmazonS3Builder`
//! - Local directories through `LocalFileSystem`
//! - Preflight checks: location reachable, objects present, files matching
//!   the glob the query engine reads present

mod location;
mod preflight;

pub use location::{glob_to_regex, listing_prefix, InputLocation};
pub use preflight::{run_preflight, CheckOutcome};

#[cfg(test)]
mod tests;
