//! Common types used throughout parquet-normalize
//!
//! Shared enums and constants used by the configuration, query engine and
//! preflight modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Constants
// ============================================================================

/// Name of the view that exposes the unioned input files
pub const SOURCE_VIEW: &str = "raw";

/// File name of the normalized output inside the output directory
pub const OUTPUT_FILE_NAME: &str = "normalized.parquet";

/// Marker prefix of DuckDB map types (e.g. `MAP(VARCHAR, VARCHAR)`)
pub const MAP_TYPE_MARKER: &str = "MAP";

// ============================================================================
// Input Format
// ============================================================================

/// File format of the input dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Apache Parquet files
    #[default]
    Parquet,
    /// Comma-separated values (never carries MAP columns)
    Csv,
}

impl InputFormat {
    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            InputFormat::Parquet => "parquet",
            InputFormat::Csv => "csv",
        }
    }

    /// DuckDB table function used to scan files of this format
    pub fn reader_function(self) -> &'static str {
        match self {
            InputFormat::Parquet => "read_parquet",
            InputFormat::Csv => "read_csv",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parquet" => Ok(InputFormat::Parquet),
            "csv" => Ok(InputFormat::Csv),
            other => Err(format!("expected 'parquet' or 'csv', got '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("parquet", InputFormat::Parquet ; "lowercase parquet")]
    #[test_case("PARQUET", InputFormat::Parquet ; "uppercase parquet")]
    #[test_case(" csv ", InputFormat::Csv ; "padded csv")]
    fn test_parse_input_format(raw: &str, expected: InputFormat) {
        assert_eq!(raw.parse::<InputFormat>().unwrap(), expected);
    }

    #[test]
    fn test_parse_input_format_rejects_unknown() {
        let err = "json".parse::<InputFormat>().unwrap_err();
        assert!(err.contains("'json'"));
    }

    #[test]
    fn test_reader_function() {
        assert_eq!(InputFormat::Parquet.reader_function(), "read_parquet");
        assert_eq!(InputFormat::Csv.reader_function(), "read_csv");
        assert_eq!(InputFormat::default().extension(), "parquet");
    }
}
