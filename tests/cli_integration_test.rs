// End-to-end tests for the debtmap-validate binary

use assert_cmd::Command;
use debtmap_validate::validation::{Status, ValidationReport};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fixtures")
        .join(name)
}

/// Binary with the pipeline environment cleared so host settings cannot leak in.
fn debtmap_validate() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_debtmap-validate"));
    for var in [
        "PRODIGY_AUTOMATION",
        "PRODIGY_VALIDATION",
        "PRODIGY_FIX_SUCCESSFUL",
        "PRODIGY_FIX_FAILED",
        "PRODIGY_FIX_TOTAL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn read_report(path: &Path) -> ValidationReport {
    let content = fs::read_to_string(path).expect("report written");
    serde_json::from_str(&content).expect("report is valid JSON")
}

#[test]
fn test_validate_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("validation.json");

    let assert = debtmap_validate()
        .arg("validate")
        .arg("--before")
        .arg(fixture("before.json"))
        .arg("--after")
        .arg(fixture("after_improved.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Validation complete: 82.7% improvement"));
    assert!(stdout.contains("Status: complete"));

    let report = read_report(&output);
    assert_eq!(report.status, Status::Complete);
    assert!(report.fix_attempts.is_none());
}

#[test]
fn test_strict_mode_fails_incomplete_validation() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("validation.json");

    debtmap_validate()
        .arg("validate")
        .arg("--before")
        .arg(fixture("before.json"))
        .arg("--after")
        .arg(fixture("after_regression.json"))
        .arg("--output")
        .arg(&output)
        .arg("--strict")
        .arg("--quiet")
        .assert()
        .code(1);

    // The report is still written before the exit
    assert_eq!(read_report(&output).status, Status::Failed);
}

#[test]
fn test_missing_input_still_writes_failure_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("validation.json");
    let missing = dir.path().join("missing.json");

    debtmap_validate()
        .arg("validate")
        .arg("--before")
        .arg(&missing)
        .arg("--after")
        .arg(fixture("after_improved.json"))
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success();

    let report = read_report(&output);
    assert_eq!(report.status, Status::Failed);
    assert_eq!(report.completion_percentage, 0.0);
    assert_eq!(
        report.remaining_issues,
        vec![format!("Failed to load before debtmap from {}", missing.display())]
    );
}

#[test]
fn test_fix_attempt_counters_from_environment() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("validation.json");

    debtmap_validate()
        .env("PRODIGY_FIX_SUCCESSFUL", "3")
        .env("PRODIGY_FIX_FAILED", "1")
        .arg("validate")
        .arg("--before")
        .arg(fixture("before.json"))
        .arg("--after")
        .arg(fixture("after_improved.json"))
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success();

    let attempts = read_report(&output).fix_attempts.expect("fix attempts echoed");
    assert_eq!(attempts.successful, 3);
    assert_eq!(attempts.failed, 1);
    assert_eq!(attempts.total, 4);
}

#[test]
fn test_automation_mode_suppresses_summary() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("validation.json");

    let assert = debtmap_validate()
        .env("PRODIGY_AUTOMATION", "true")
        .arg("validate")
        .arg("--before")
        .arg(fixture("before.json"))
        .arg("--after")
        .arg(fixture("after_improved.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(assert.get_output().stdout.is_empty());
    assert!(output.exists());
}

#[test]
fn test_invalid_config_file_produces_failure_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("validation.json");
    let config = dir.path().join("validate.toml");
    fs::write(&config, "[weights]\ncritical_resolution = -1.0\n").unwrap();

    debtmap_validate()
        .arg("validate")
        .arg("--before")
        .arg(fixture("before.json"))
        .arg("--after")
        .arg(fixture("after_improved.json"))
        .arg("--output")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .arg("--quiet")
        .assert()
        .success();

    let report = read_report(&output);
    assert_eq!(report.status, Status::Failed);
    assert_eq!(
        report.remaining_issues,
        vec!["Invalid validation configuration".to_string()]
    );
}

#[test]
fn test_batch_validates_every_manifest_entry() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    let entries = serde_json::json!([
        {
            "name": "improved",
            "before": fixture("before.json"),
            "after": fixture("after_improved.json"),
            "output": "reports/improved.json"
        },
        {
            "name": "regressed",
            "before": fixture("before.json"),
            "after": fixture("after_regression.json"),
            "output": "reports/regressed.json"
        }
    ]);
    fs::write(&manifest, serde_json::to_string_pretty(&entries).unwrap()).unwrap();

    let assert = debtmap_validate()
        .arg("batch")
        .arg("--manifest")
        .arg(&manifest)
        .arg("--jobs")
        .arg("2")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("improved: 82.7% complete"));
    assert!(lines[1].starts_with("regressed: 7.5% failed"));

    // Relative outputs land next to the manifest
    let reports = dir.path().join("reports");
    assert_eq!(read_report(&reports.join("improved.json")).status, Status::Complete);
    assert_eq!(read_report(&reports.join("regressed.json")).status, Status::Failed);
}

#[test]
fn test_batch_strict_mode_requires_every_pair_complete() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    let entries = serde_json::json!([
        {
            "name": "regressed",
            "before": fixture("before.json"),
            "after": fixture("after_regression.json"),
            "output": "out.json"
        }
    ]);
    fs::write(&manifest, entries.to_string()).unwrap();

    debtmap_validate()
        .arg("batch")
        .arg("--manifest")
        .arg(&manifest)
        .arg("--strict")
        .arg("--quiet")
        .assert()
        .code(1);
}

#[test]
fn test_unknown_format_is_rejected() {
    debtmap_validate()
        .arg("validate")
        .arg("--before")
        .arg(fixture("before.json"))
        .arg("--after")
        .arg(fixture("after_improved.json"))
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure();
}
