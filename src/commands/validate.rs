//! `validate` command: one before/after pair.
//!
//! The shell always writes a report. Any failure before scoring (unreadable
//! or unrecognized input, invalid configuration) becomes the minimal failed
//! report rather than an error, so the calling pipeline never blocks on a
//! missing document.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{
    load_config, load_config_from_path, MatchSensitivity, ThresholdPreset, ValidationConfig,
};
use crate::io::{load_previous_report, load_snapshot, print_validation_summary, write_report};
use crate::observability::set_current_comparison;
use crate::output::{format_terminal, OutputFormat};
use crate::validation::{validate_snapshots, FixAttempts, ValidationReport};

/// Configuration for one validation run.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    pub before: PathBuf,
    pub after: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub preset: Option<ThresholdPreset>,
    pub matching: Option<MatchSensitivity>,
    pub previous: Option<PathBuf>,
    pub fix_attempts: Option<FixAttempts>,
    pub quiet: bool,
}

/// I/O Shell: Validate one pair and write the report.
///
/// Returns the report that was written.
pub fn validate_improvement(config: ValidateConfig) -> Result<ValidationReport> {
    let report = match resolve_config(config.config.as_deref(), config.preset, config.matching) {
        Ok(validation_config) => evaluate_pair(
            &config.before,
            &config.after,
            config.previous.as_deref(),
            &validation_config,
        ),
        Err(e) => ValidationReport::failure(
            "Invalid validation configuration",
            format!("{:#}", e),
        ),
    }
    .with_fix_attempts(config.fix_attempts);

    write_report(&config.output, &report, config.format)?;

    if !config.quiet {
        if config.format == OutputFormat::Terminal {
            print!("{}", format_terminal(&report));
        } else {
            print_validation_summary(&report);
        }
    }

    Ok(report)
}

/// Resolve the effective configuration: explicit file or discovery, then
/// command-line overrides.
pub fn resolve_config(
    path: Option<&Path>,
    preset: Option<ThresholdPreset>,
    matching: Option<MatchSensitivity>,
) -> Result<ValidationConfig> {
    let mut config = match path {
        Some(path) => load_config_from_path(path)?,
        None => load_config(),
    };
    if let Some(preset) = preset {
        config = config.with_preset(preset);
    }
    if let Some(matching) = matching {
        config = config.with_matching(matching);
    }
    Ok(config.validated()?)
}

/// Load both snapshots and validate; load failures become failed reports.
pub fn evaluate_pair(
    before_path: &Path,
    after_path: &Path,
    previous_path: Option<&Path>,
    config: &ValidationConfig,
) -> ValidationReport {
    let _comparison = set_current_comparison(format!(
        "{} -> {}",
        before_path.display(),
        after_path.display()
    ));

    let before = match load_snapshot(before_path) {
        Ok(snapshot) => snapshot,
        Err(e) => return load_failure("before", before_path, &e),
    };
    let after = match load_snapshot(after_path) {
        Ok(snapshot) => snapshot,
        Err(e) => return load_failure("after", after_path, &e),
    };

    let previous = previous_path.and_then(|path| match load_previous_report(path) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Ignoring unreadable previous validation");
            None
        }
    });

    validate_snapshots(&before, &after, config, previous.as_ref())
}

fn load_failure(side: &str, path: &Path, error: &anyhow::Error) -> ValidationReport {
    warn!(side, path = %path.display(), error = %format!("{:#}", error), "Snapshot load failed");
    ValidationReport::failure(
        format!("Failed to load {} debtmap from {}", side, path.display()),
        format!("{:#}", error),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Status;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    const BEFORE: &str = indoc! {r#"
        {
          "items": [
            {"location": {"file": "src/a.rs", "function": "parse", "line": 10},
             "unified_score": {"final_score": 9.5}},
            {"location": {"file": "src/a.rs", "function": "emit", "line": 40},
             "unified_score": {"final_score": 3.0}}
          ]
        }
    "#};

    const AFTER: &str = indoc! {r#"
        {
          "items": [
            {"location": {"file": "src/a.rs", "function": "emit", "line": 41},
             "unified_score": {"final_score": 2.0}}
          ]
        }
    "#};

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_evaluate_pair_scores_real_files() {
        let dir = TempDir::new().unwrap();
        let before = write(&dir, "before.json", BEFORE);
        let after = write(&dir, "after.json", AFTER);

        let report = evaluate_pair(&before, &after, None, &ValidationConfig::default());

        assert_eq!(report.status, Status::Complete);
        assert_eq!(report.before_summary.total_items, 2);
        assert_eq!(report.after_summary.total_items, 1);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_missing_before_file_produces_failure_report() {
        let dir = TempDir::new().unwrap();
        let after = write(&dir, "after.json", AFTER);
        let missing = dir.path().join("missing.json");

        let report = evaluate_pair(&missing, &after, None, &ValidationConfig::default());

        assert_eq!(report.status, Status::Failed);
        assert_eq!(report.completion_percentage, 0.0);
        assert_eq!(
            report.remaining_issues,
            vec![format!("Failed to load before debtmap from {}", missing.display())]
        );
        assert!(report.error.is_some());
    }

    #[test]
    fn test_unreadable_previous_report_is_ignored() {
        let dir = TempDir::new().unwrap();
        let before = write(&dir, "before.json", BEFORE);
        let after = write(&dir, "after.json", AFTER);
        let previous = write(&dir, "previous.md", "# not json");

        let report = evaluate_pair(&before, &after, Some(&previous), &ValidationConfig::default());

        assert!(report.trend_analysis.is_none());
        assert!(report.attempt_number.is_none());
    }

    #[test]
    fn test_validate_improvement_writes_report_even_on_failure() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("validation.json");

        let report = validate_improvement(ValidateConfig {
            before: dir.path().join("nope.json"),
            after: dir.path().join("nope.json"),
            output: output.clone(),
            format: OutputFormat::Json,
            config: None,
            preset: None,
            matching: None,
            previous: None,
            fix_attempts: Some(FixAttempts {
                successful: 1,
                failed: 2,
                total: 3,
            }),
            quiet: true,
        })
        .unwrap();

        assert_eq!(report.status, Status::Failed);
        let written: ValidationReport =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.fix_attempts.map(|f| f.total), Some(3));
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.toml", "new_critical_penalty = 10.0\n");

        let config = resolve_config(
            Some(&path),
            Some(ThresholdPreset::Scaled),
            Some(MatchSensitivity::Exact),
        )
        .unwrap();

        assert_eq!(config.new_critical_penalty, 10.0);
        assert_eq!(config.thresholds.critical, 80.0);
        assert_eq!(config.matching, MatchSensitivity::Exact);
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.toml", "[thresholds]\ncritical = 1.0\nhigh = 6.0\n");

        assert!(resolve_config(Some(&path), None, None).is_err());
    }
}
