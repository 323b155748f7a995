//! `batch` command: many independent before/after pairs.
//!
//! Every manifest entry is a self-contained comparison, so entries run in
//! parallel on the rayon pool with no shared state beyond the read-only
//! configuration.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::{ThresholdPreset, ValidationConfig};
use crate::io::{load_manifest, write_report, BatchEntry};
use crate::output::OutputFormat;
use crate::validation::{Status, ValidationReport};

use super::validate::{evaluate_pair, resolve_config};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub manifest: PathBuf,
    pub config: Option<PathBuf>,
    pub preset: Option<ThresholdPreset>,
    pub format: OutputFormat,
    pub jobs: usize,
    pub quiet: bool,
}

/// Result of one manifest entry.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub name: String,
    pub output: PathBuf,
    pub completion_percentage: f64,
    pub status: Status,
    /// Set when the report could not be written
    pub write_error: Option<String>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete && self.write_error.is_none()
    }
}

/// I/O Shell: Validate every manifest entry and write each report.
pub fn run_batch(config: BatchConfig) -> Result<Vec<BatchOutcome>> {
    let entries = load_manifest(&config.manifest)?;
    let validation_config = resolve_config(config.config.as_deref(), config.preset, None)
        .context("Failed to resolve batch configuration")?;

    info!(pairs = entries.len(), "Running batch validation");

    let outcomes = if config.jobs == 0 {
        validate_entries(&entries, &validation_config, config.format)
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .context("Failed to build batch thread pool")?;
        pool.install(|| validate_entries(&entries, &validation_config, config.format))
    };

    if !config.quiet {
        for outcome in &outcomes {
            println!("{}", summary_line(outcome));
        }
    }

    Ok(outcomes)
}

/// Validate entries in parallel; output order follows manifest order.
pub fn validate_entries(
    entries: &[BatchEntry],
    config: &ValidationConfig,
    format: OutputFormat,
) -> Vec<BatchOutcome> {
    entries
        .par_iter()
        .map(|entry| {
            let report = evaluate_pair(&entry.before, &entry.after, None, config);
            let write_error = write_report(&entry.output, &report, format)
                .err()
                .map(|e| {
                    error!(name = %entry.name, error = %format!("{:#}", e), "Failed to write report");
                    format!("{:#}", e)
                });
            outcome(entry, &report, write_error)
        })
        .collect()
}

fn outcome(entry: &BatchEntry, report: &ValidationReport, write_error: Option<String>) -> BatchOutcome {
    BatchOutcome {
        name: entry.name.clone(),
        output: entry.output.clone(),
        completion_percentage: report.completion_percentage,
        status: report.status,
        write_error,
    }
}

/// Pure: One console line per batch entry.
pub fn summary_line(outcome: &BatchOutcome) -> String {
    match &outcome.write_error {
        Some(err) => format!("{}: report not written ({})", outcome.name, err),
        None => format!(
            "{}: {:.1}% {} -> {}",
            outcome.name,
            outcome.completion_percentage,
            outcome.status,
            outcome.output.display()
        ),
    }
}
