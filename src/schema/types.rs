//! Schema types

use crate::types::MAP_TYPE_MARKER;
use serde::{Deserialize, Serialize};

/// A column of the input view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name as reported by DuckDB
    pub name: String,
    /// Declared DuckDB type, e.g. `VARCHAR` or `MAP(VARCHAR, VARCHAR)`
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }

    /// Whether the column holds key-value maps
    ///
    /// Lists and arrays of maps (`MAP(..)[]`) are not map-typed.
    pub fn is_map(&self) -> bool {
        let declared = self.column_type.trim().to_ascii_uppercase();
        declared.starts_with(MAP_TYPE_MARKER) && declared.ends_with(')')
    }
}

/// Ordered column list of the input view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<ColumnInfo>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    /// All columns in declaration order
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Map-typed columns in declaration order
    pub fn map_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.is_map())
    }

    /// Find a column by name, ignoring ASCII case
    pub fn find(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<ColumnInfo> for TableSchema {
    fn from_iter<I: IntoIterator<Item = ColumnInfo>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A map-typed column together with every key observed in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapColumn {
    pub name: String,
    /// Distinct keys, sorted
    pub keys: Vec<String>,
}

impl MapColumn {
    pub fn new(name: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }
}
