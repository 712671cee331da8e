//! Projection builder

use crate::schema::{ColumnInfo, MapColumn, TableSchema};
use crate::sql::{quote_ident, quote_literal};
use serde::Serialize;
use std::collections::HashSet;

/// One output column derived from a map key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlattenedColumn {
    /// Output column name (`{source}_{key}`)
    pub name: String,
    /// Map column the value is extracted from
    pub source: String,
    /// Map key
    pub key: String,
    /// Input column of the same name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coalesced_with: Option<ColumnInfo>,
}

impl FlattenedColumn {
    /// Expression reading this key from the map, NULL when absent
    pub fn extraction(&self) -> String {
        format!(
            "map_extract({}, {})[1]",
            quote_ident(&self.source),
            quote_literal(&self.key)
        )
    }

    /// Projection item producing this column
    pub fn select_clause(&self) -> String {
        match &self.coalesced_with {
            Some(existing) => {
                let ident = quote_ident(&existing.name);
                format!(
                    "COALESCE({ident}, TRY_CAST({} AS {})) AS {ident}",
                    self.extraction(),
                    existing.column_type
                )
            }
            None => format!("{} AS {}", self.extraction(), quote_ident(&self.name)),
        }
    }

    /// Name the column carries in the output (the input's spelling on collision)
    pub fn output_name(&self) -> &str {
        self.coalesced_with
            .as_ref()
            .map_or(self.name.as_str(), |existing| existing.name.as_str())
    }

    pub fn is_coalesced(&self) -> bool {
        self.coalesced_with.is_some()
    }
}

/// The full flattening projection for one dataset
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlattenPlan {
    map_columns: Vec<MapColumn>,
    columns: Vec<FlattenedColumn>,
}

impl FlattenPlan {
    /// Build the plan from the input schema and the keys of each map column
    ///
    /// Map columns are visited in the given order and keys in their listed
    /// order. Every pair yields a column. The first pair landing on a plain
    /// input column is coalesced into it; any later pair whose name is
    /// already taken (ignoring case) gets the first free `_1`, `_2`, ...
    /// suffix.
    pub fn build(schema: &TableSchema, map_columns: Vec<MapColumn>) -> Self {
        let mut taken = HashSet::new();
        let mut columns = Vec::new();

        for map in &map_columns {
            for key in &map.keys {
                let name = format!("{}_{key}", map.name);
                let existing = schema.find(&name).filter(|c| !c.is_map()).cloned();

                if !taken.contains(&name.to_ascii_lowercase()) {
                    if let Some(existing) = existing {
                        if !existing.column_type.eq_ignore_ascii_case("VARCHAR") {
                            tracing::warn!(
                                column = %existing.name,
                                column_type = %existing.column_type,
                                "Map values that do not convert to the existing column type are dropped"
                            );
                        }
                        taken.insert(name.to_ascii_lowercase());
                        columns.push(FlattenedColumn {
                            name,
                            source: map.name.clone(),
                            key: key.clone(),
                            coalesced_with: Some(existing),
                        });
                        continue;
                    }
                }

                let unique = unique_name(&name, schema, &taken);
                if unique != name {
                    tracing::warn!(
                        column = %name,
                        renamed = %unique,
                        source = %map.name,
                        "Flattened column name already taken, renamed"
                    );
                }
                taken.insert(unique.to_ascii_lowercase());
                columns.push(FlattenedColumn {
                    name: unique,
                    source: map.name.clone(),
                    key: key.clone(),
                    coalesced_with: None,
                });
            }
        }

        Self {
            map_columns,
            columns,
        }
    }

    /// Map columns with their keys, as given to [`FlattenPlan::build`]
    pub fn map_columns(&self) -> &[MapColumn] {
        &self.map_columns
    }

    /// Columns produced from map keys, in projection order
    pub fn flattened_columns(&self) -> &[FlattenedColumn] {
        &self.columns
    }

    pub fn has_map_columns(&self) -> bool {
        !self.map_columns.is_empty()
    }

    /// True when the projection is plain `*`
    pub fn is_noop(&self) -> bool {
        self.columns.is_empty()
    }

    /// Projection items, starting with the `*` base
    pub fn select_clauses(&self) -> Vec<String> {
        let replaced: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.is_coalesced())
            .map(FlattenedColumn::select_clause)
            .collect();

        let base = if replaced.is_empty() {
            "*".to_string()
        } else {
            format!("* REPLACE ({})", replaced.join(", "))
        };

        std::iter::once(base)
            .chain(
                self.columns
                    .iter()
                    .filter(|c| !c.is_coalesced())
                    .map(FlattenedColumn::select_clause),
            )
            .collect()
    }

    /// Full SELECT statement over `relation`
    pub fn to_sql(&self, relation: &str) -> String {
        format!(
            "SELECT {}\n  FROM {}",
            self.select_clauses().join(",\n       "),
            quote_ident(relation)
        )
    }
}

/// `name`, or `name_N` for the smallest N free in both the schema and `taken`
fn unique_name(name: &str, schema: &TableSchema, taken: &HashSet<String>) -> String {
    let is_free = |candidate: &str| {
        !schema.contains(candidate) && !taken.contains(&candidate.to_ascii_lowercase())
    };

    if is_free(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| format!("{name}_{n}"))
        .find(|candidate| is_free(candidate.as_str()))
        .unwrap_or_else(|| name.to_string())
}
