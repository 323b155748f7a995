//! Improvement validation over a snapshot comparison.
//!
//! # Module Structure
//!
//! - `types` - Report data structures
//! - `scoring` - Pure scoring logic (sub-scores, composite)
//! - `gaps` - Status determination and gap diagnostics
//! - `messages` - Improvement and remaining-issue lines
//! - `trend` - Trend analysis against a previous attempt
//!
//! # Scoring Algorithm
//!
//! The completion percentage is a weighted composite of four components:
//! - Critical resolution (40%): were the critical items resolved?
//! - Overall improvement (30%): did the total debt score decrease?
//! - Complexity reduction (20%): did average complexity decrease?
//! - No new critical debt (10%): 25 points off per new critical item
//!
//! # Examples
//!
//! ```no_run
//! use debtmap_validate::config::ValidationConfig;
//! use debtmap_validate::snapshot::parse_snapshot;
//! use debtmap_validate::validation::validate_snapshots;
//!
//! let before = parse_snapshot("before.json", r#"{"items": []}"#).unwrap();
//! let after = parse_snapshot("after.json", r#"{"items": []}"#).unwrap();
//! let report = validate_snapshots(&before, &after, &ValidationConfig::default(), None);
//! println!("{}", report.status);
//! ```

pub mod gaps;
pub mod messages;
pub mod scoring;
pub mod trend;
pub mod types;

pub use types::{
    FixAttempts, GapDetail, ScoreBreakdown, Severity, SnapshotSummary, Status, TrendAnalysis,
    TrendDirection, ValidationReport,
};

use tracing::info;

use crate::comparison::{compare_snapshots, ComparisonResult};
use crate::config::ValidationConfig;
use crate::snapshot::Snapshot;

use gaps::{build_gaps, determine_status};
use messages::{format_improvements, format_remaining_issues};
use scoring::score_comparison;
use trend::{calculate_trend_analysis, next_attempt_number};
use types::round_to;

// =============================================================================
// Public API
// =============================================================================

/// Pure: Compare two snapshots and judge the improvement.
pub fn validate_snapshots(
    before: &Snapshot,
    after: &Snapshot,
    config: &ValidationConfig,
    previous: Option<&ValidationReport>,
) -> ValidationReport {
    let comparison = compare_snapshots(before, after, config);
    build_report(&comparison, config, previous)
}

/// Pure: Turn a comparison into a validation report.
pub fn build_report(
    comparison: &ComparisonResult,
    config: &ValidationConfig,
    previous: Option<&ValidationReport>,
) -> ValidationReport {
    let breakdown = score_comparison(comparison, config);
    // Cutoffs apply to the exact composite; rounding is for display only
    let status = determine_status(breakdown.composite, &config.status);
    let completion = round_to(breakdown.composite, 1);

    info!(
        completion = completion,
        status = %status,
        resolved = comparison.resolved.len(),
        new = comparison.new_items.len(),
        "Validation scored"
    );

    let thresholds = &config.thresholds;

    ValidationReport {
        completion_percentage: completion,
        status,
        improvements: format_improvements(comparison, thresholds),
        remaining_issues: format_remaining_issues(comparison, thresholds),
        gaps: build_gaps(comparison, status, config),
        before_summary: SnapshotSummary::from_stats(
            &comparison.before_stats,
            comparison.before_reported_total,
        ),
        after_summary: SnapshotSummary::from_stats(
            &comparison.after_stats,
            comparison.after_reported_total,
        ),
        score_breakdown: breakdown,
        category_changes: comparison.category_changes(),
        fix_attempts: None,
        trend_analysis: previous.map(|prev| calculate_trend_analysis(prev, completion)),
        attempt_number: previous.map(next_attempt_number),
        error: None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{DebtItem, ItemIdentity, SchemaKind};

    fn item(function: &str, score: f64) -> DebtItem {
        DebtItem::new(ItemIdentity::new("src/lib.rs", function, None), score)
    }

    fn snapshot(items: Vec<DebtItem>) -> Snapshot {
        Snapshot::new("mem", SchemaKind::UnifiedItems, items)
    }

    fn validate(before: Vec<DebtItem>, after: Vec<DebtItem>) -> ValidationReport {
        validate_snapshots(
            &snapshot(before),
            &snapshot(after),
            &ValidationConfig::default(),
            None,
        )
    }

    #[test]
    fn test_resolving_single_critical_item() {
        let report = validate(vec![item("f", 10.0)], vec![]);

        assert_eq!(report.score_breakdown.critical_resolution, 100.0);
        assert!(report.completion_percentage >= 40.0);
        assert_ne!(report.status, Status::Failed);
        assert_eq!(report.improvements[0], "Resolved 1 critical debt items");
    }

    #[test]
    fn test_empty_snapshots() {
        let report = validate(vec![], vec![]);

        assert_eq!(report.status, Status::Failed);
        assert!(report.gaps.is_empty());
        assert_eq!(report.before_summary, SnapshotSummary::default());
        assert_eq!(report.after_summary, SnapshotSummary::default());
        assert!(report.completion_percentage.is_finite());
    }

    #[test]
    fn test_self_comparison_fails_with_no_movement() {
        let items = vec![item("a", 9.0), item("b", 4.0)];
        let report = validate(items.clone(), items);

        assert_eq!(report.status, Status::Failed);
        assert!(report.improvements.is_empty());
        assert_eq!(report.score_breakdown.overall_improvement, 0.0);
        assert_eq!(report.score_breakdown.critical_resolution, 0.0);
        assert!(report
            .gaps
            .contains_key("critical_debt_remaining:src/lib.rs:a"));
    }

    #[test]
    fn test_status_uses_unrounded_composite() {
        // composite 74.96 displays as 75.0 but stays below the complete cutoff
        let report = validate(vec![item("crit", 10.0), item("x", 5.0)], vec![item("x", 2.52)]);

        assert!(report.score_breakdown.composite < 75.0);
        assert_eq!(report.completion_percentage, 75.0);
        assert_eq!(report.status, Status::Incomplete);
    }

    #[test]
    fn test_new_critical_item_scores_below_baseline() {
        let baseline = validate(vec![item("f", 10.0)], vec![item("f", 10.0)]);
        let with_new = validate(vec![item("f", 10.0)], vec![item("f", 10.0), item("g", 9.0)]);

        assert_eq!(with_new.score_breakdown.no_new_critical, 75.0);
        assert!(with_new.completion_percentage < baseline.completion_percentage);
    }

    #[test]
    fn test_previous_report_adds_trend_and_attempt() {
        let mut previous = ValidationReport::failure("x", "y");
        previous.completion_percentage = 10.0;
        previous.attempt_number = Some(2);

        let report = validate_snapshots(
            &snapshot(vec![item("f", 10.0)]),
            &snapshot(vec![]),
            &ValidationConfig::default(),
            Some(&previous),
        );

        assert_eq!(report.attempt_number, Some(3));
        let trend = report.trend_analysis.unwrap();
        assert_eq!(trend.direction, TrendDirection::Progress);
    }
}
