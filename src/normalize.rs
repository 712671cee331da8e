//! Normalization pipeline
//!
//! Runs the stages in order: open the input view, inspect its schema,
//! enumerate the keys of every map column, build the flattening projection
//! and write the result.
//!
//! ```rust,ignore
//! use parquet_normalize::{NormalizeConfig, Normalizer};
//!
//! let config = NormalizeConfig::from_env()?;
//! let report = Normalizer::new(config)?.run()?;
//! println!("{} rows written", report.output.num_rows);
//! ```

use crate::config::NormalizeConfig;
use crate::database::DatabaseEngine;
use crate::error::Result;
use crate::flatten::FlattenPlan;
use crate::output::{write_parquet, ParquetSummary};
use crate::schema::{MapColumn, TableSchema};
use crate::types::SOURCE_VIEW;
use serde::Serialize;

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeReport {
    /// The written file
    pub output: ParquetSummary,
    /// Map columns and the keys found in them
    pub map_columns: Vec<MapColumn>,
    /// Columns produced from map keys
    pub flattened_columns: Vec<String>,
    /// Subset of `flattened_columns` that already existed in the input
    pub coalesced_columns: Vec<String>,
    /// Statement that produced the output
    pub sql: String,
}

/// Flattens the map columns of one input dataset
pub struct Normalizer {
    config: NormalizeConfig,
    engine: DatabaseEngine,
    source_uri: String,
}

impl Normalizer {
    /// Open the query engine and register the input files
    pub fn new(config: NormalizeConfig) -> Result<Self> {
        let engine = DatabaseEngine::open()?;
        let source_uri = engine.register_source(&config.input, config.input_format)?;

        tracing::info!(source = %source_uri, "Opened input dataset");

        Ok(Self {
            config,
            engine,
            source_uri,
        })
    }

    /// URI the input view reads from
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// Columns of the input view
    pub fn schema(&self) -> Result<TableSchema> {
        self.engine.describe()
    }

    /// Number of rows in the input view
    pub fn row_count(&self) -> Result<u64> {
        self.engine.count_rows()
    }

    /// Inspect the input and build the flattening projection
    pub fn plan(&self) -> Result<FlattenPlan> {
        let schema = self.engine.describe()?;
        self.plan_for(&schema)
    }

    /// Build the flattening projection for an already inspected schema
    pub fn plan_for(&self, schema: &TableSchema) -> Result<FlattenPlan> {
        let map_names: Vec<&str> = schema.map_columns().map(|c| c.name.as_str()).collect();
        tracing::debug!("MAP columns found: {:?}", map_names);

        let map_columns = self.engine.map_columns(schema)?;
        let plan = FlattenPlan::build(schema, map_columns);

        if !plan.has_map_columns() {
            tracing::debug!("No MAP columns found. No normalization needed.");
        } else if plan.is_noop() {
            tracing::debug!("MAP columns hold no keys. No normalization needed.");
        } else {
            tracing::debug!(
                "Generated SELECT clauses:\n{}",
                plan.select_clauses().join("\n")
            );
        }

        Ok(plan)
    }

    /// Execute `plan` and write the output file
    pub fn write(&self, plan: &FlattenPlan) -> Result<NormalizeReport> {
        let sql = plan.to_sql(SOURCE_VIEW);
        let output_path = self.config.output_path();

        let output = write_parquet(&self.engine, &sql, &output_path)?;

        tracing::debug!(
            rows = output.num_rows,
            "Normalized parquet written to {}",
            output_path.display()
        );

        let flattened = plan.flattened_columns();
        Ok(NormalizeReport {
            output,
            map_columns: plan.map_columns().to_vec(),
            flattened_columns: flattened
                .iter()
                .map(|c| c.output_name().to_string())
                .collect(),
            coalesced_columns: flattened
                .iter()
                .filter(|c| c.is_coalesced())
                .map(|c| c.output_name().to_string())
                .collect(),
            sql,
        })
    }

    /// Plan and write in one go
    pub fn run(&self) -> Result<NormalizeReport> {
        let plan = self.plan()?;
        self.write(&plan)
    }
}
