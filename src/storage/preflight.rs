//! Preflight checks run by the `check` command

use super::location::InputLocation;
use crate::config::NormalizeConfig;
use serde::Serialize;

/// Result of a single preflight check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub check: String,
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    fn pass(check: &str, message: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            passed: true,
            message: message.into(),
        }
    }

    fn fail(check: &str, message: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            passed: false,
            message: message.into(),
        }
    }
}

/// Check that the input location is reachable and holds input files
///
/// Stops at the first failed check since later ones depend on it.
pub async fn run_preflight(config: &NormalizeConfig) -> Vec<CheckOutcome> {
    let extension = config.input_format.extension();
    let mut outcomes = Vec::new();

    let location = match InputLocation::from_source(&config.input, config.input_format) {
        Ok(location) => location,
        Err(e) => {
            outcomes.push(CheckOutcome::fail("input_location", e.to_string()));
            return outcomes;
        }
    };

    let objects = match location.list().await {
        Ok(objects) => {
            outcomes.push(CheckOutcome::pass(
                "input_location",
                format!("Listed {}", location.url()),
            ));
            objects
        }
        Err(e) => {
            outcomes.push(CheckOutcome::fail(
                "input_location",
                format!("Failed to list {}: {e}", location.url()),
            ));
            return outcomes;
        }
    };

    if objects.is_empty() {
        outcomes.push(CheckOutcome::fail(
            "input_objects",
            format!("No objects found under {}", location.url()),
        ));
        return outcomes;
    }
    outcomes.push(CheckOutcome::pass(
        "input_objects",
        format!("Found {} object(s) under {}", objects.len(), location.url()),
    ));

    // Same selection the query engine makes: the listing is recursive,
    // the reader glob is not.
    let matching = objects.iter().filter(|meta| location.matches(meta)).count();

    if matching == 0 {
        outcomes.push(CheckOutcome::fail(
            "input_files",
            format!(
                "No files of type {extension} match {} under {}",
                location.pattern(),
                location.url()
            ),
        ));
    } else {
        outcomes.push(CheckOutcome::pass(
            "input_files",
            format!(
                "Found {matching} file(s) matching {} under {}",
                location.pattern(),
                location.url()
            ),
        ));
    }

    tracing::debug!(checks = outcomes.len(), "Preflight finished");
    outcomes
}
