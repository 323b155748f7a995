//! I/O operations (the imperative shell).
//!
//! All file system interaction lives here; everything it hands to or
//! receives from the comparison core is plain data.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::{format_report, OutputFormat};
use crate::snapshot::{parse_snapshot, Snapshot};
use crate::validation::ValidationReport;

/// I/O: Load and normalize a debt report from disk.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read debt report: {}", path.display()))?;

    let snapshot = parse_snapshot(&path.display().to_string(), &content)
        .with_context(|| format!("Failed to normalize debt report: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        schema = ?snapshot.schema,
        items = snapshot.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

/// I/O: Load a previous validation report from disk.
pub fn load_previous_report(path: &Path) -> Result<ValidationReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read validation file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse validation JSON from: {}", path.display()))
}

/// I/O: Write a validation report, creating parent directories as needed.
pub fn write_report(path: &Path, report: &ValidationReport, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let output = format_report(report, format)?;

    fs::write(path, output)
        .with_context(|| format!("Failed to write validation result to: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Validation report written");
    Ok(())
}

/// One before/after pair in a batch manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchEntry {
    pub name: String,
    pub before: PathBuf,
    pub after: PathBuf,
    pub output: PathBuf,
}

impl BatchEntry {
    /// Resolve relative paths against the manifest's directory.
    fn resolve_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.before = resolve(self.before);
        self.after = resolve(self.after);
        self.output = resolve(self.output);
        self
    }
}

/// I/O: Load a batch manifest (a JSON list of [`BatchEntry`]).
///
/// Relative paths in the manifest are relative to the manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<BatchEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch manifest: {}", path.display()))?;

    let entries: Vec<BatchEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch manifest: {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(entries
        .into_iter()
        .map(|entry| entry.resolve_against(base))
        .collect())
}

/// I/O: Print a short validation summary to stdout.
pub fn print_validation_summary(report: &ValidationReport) {
    println!(
        "\nValidation complete: {:.1}% improvement",
        report.completion_percentage
    );
    println!("Status: {}", report.status);
}
