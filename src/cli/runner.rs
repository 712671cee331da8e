//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::NormalizeConfig;
use crate::error::{Error, Result};
use crate::flatten::FlattenPlan;
use crate::normalize::Normalizer;
use crate::storage::run_preflight;
use serde_json::{json, Value};
use std::path::PathBuf;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        self.load_env_file()?;

        match self.cli.command.unwrap_or(Commands::Normalize) {
            Commands::Normalize => self.normalize(),
            Commands::Inspect => self.inspect(),
            Commands::Check => self.check().await,
        }
    }

    /// Seed the process environment from an env file
    ///
    /// Variables already set in the process are left alone. A missing
    /// default `.env` is fine; one that fails to parse is not.
    fn load_env_file(&self) -> Result<()> {
        match &self.cli.env_file {
            Some(path) => {
                dotenvy::from_path(path)?;
                tracing::debug!("Loaded env file {}", path.display());
            }
            None => {
                if let Some(path) = unless_missing(dotenvy::dotenv())? {
                    tracing::debug!("Loaded env file {}", path.display());
                }
            }
        }
        Ok(())
    }

    /// Flatten and write the output file
    fn normalize(&self) -> Result<()> {
        let config = NormalizeConfig::from_env()?;
        let normalizer = Normalizer::new(config)?;

        let plan = normalizer.plan()?;
        self.log_plan(&plan);

        let report = normalizer.write(&plan)?;

        self.log(
            "INFO",
            format!(
                "Normalized parquet written to {}",
                report.output.path.display()
            ),
        );
        self.output_message(&json!({
            "type": "RESULT",
            "result": {
                "status": "SUCCEEDED",
                "report": report
            },
            "emitted_at": chrono::Utc::now().timestamp_millis()
        }));

        Ok(())
    }

    /// Print schema, map keys and SQL without writing
    fn inspect(&self) -> Result<()> {
        let config = NormalizeConfig::from_env()?;
        let normalizer = Normalizer::new(config)?;

        let schema = normalizer.schema()?;
        let plan = normalizer.plan_for(&schema)?;
        let rows = normalizer.row_count()?;
        self.log_plan(&plan);

        let columns: Vec<Value> = schema
            .columns()
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "type": c.column_type,
                    "is_map": c.is_map()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "SCHEMA",
            "schema": {
                "source": normalizer.source_uri(),
                "rows": rows,
                "columns": columns,
                "map_columns": plan.map_columns(),
                "flattened_columns": plan.flattened_columns(),
                "sql": plan.to_sql(crate::types::SOURCE_VIEW)
            }
        }));

        Ok(())
    }

    /// Validate configuration and input storage
    async fn check(&self) -> Result<()> {
        let config = match NormalizeConfig::from_env() {
            Ok(config) => {
                self.check_status("configuration", true, "All required settings present");
                config
            }
            Err(e) => {
                self.check_status("configuration", false, &e.to_string());
                return Err(e);
            }
        };

        let outcomes = run_preflight(&config).await;
        for outcome in &outcomes {
            self.check_status(&outcome.check, outcome.passed, &outcome.message);
        }

        let failed = outcomes.iter().filter(|o| !o.passed).count();
        if failed > 0 {
            return Err(Error::Other(format!("{failed} preflight check(s) failed")));
        }

        Ok(())
    }

    /// Emit the progress messages describing a plan
    fn log_plan(&self, plan: &FlattenPlan) {
        for (level, message) in plan_messages(plan) {
            self.log(level, message);
        }
    }

    fn log(&self, level: &str, message: impl Into<String>) {
        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": level,
                "message": message.into()
            }
        }));
    }

    fn check_status(&self, check: &str, passed: bool, message: &str) {
        self.output_message(&json!({
            "type": "CHECK_STATUS",
            "checkStatus": {
                "check": check,
                "status": if passed { "SUCCEEDED" } else { "FAILED" },
                "message": message
            }
        }));
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Progress messages describing a plan, with their levels
fn plan_messages(plan: &FlattenPlan) -> Vec<(&'static str, String)> {
    let map_names: Vec<&str> = plan.map_columns().iter().map(|m| m.name.as_str()).collect();
    let mut messages = vec![("INFO", format!("MAP columns found: {map_names:?}"))];

    if !plan.has_map_columns() {
        messages.push((
            "INFO",
            "No MAP columns found. No normalization needed.".to_string(),
        ));
    } else if plan.is_noop() {
        messages.push((
            "WARN",
            "MAP columns hold no keys. No normalization needed.".to_string(),
        ));
    } else {
        messages.push((
            "INFO",
            format!(
                "Generated SELECT clauses:\n{}",
                plan.select_clauses().join("\n")
            ),
        ));
    }
    messages
}

/// Treat a missing default env file as nothing to load
fn unless_missing(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}
