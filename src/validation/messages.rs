//! Human-readable improvement and issue lines.

use crate::comparison::{reduction_pct, ComparisonResult};
use crate::config::PriorityThresholds;

use super::gaps::unresolved_critical;

/// Pure: Improvement lines, most significant first.
pub fn format_improvements(comparison: &ComparisonResult, thresholds: &PriorityThresholds) -> Vec<String> {
    let mut improvements = Vec::new();

    if !comparison.resolved.is_empty() {
        let critical = comparison.resolved_critical(thresholds).count();
        let high = comparison
            .resolved
            .iter()
            .filter(|k| k.item.score >= thresholds.high)
            .count();
        let line = if critical > 0 {
            format!("Resolved {} critical debt items", critical)
        } else if high > 0 {
            format!("Resolved {} high-priority debt items", high)
        } else {
            format!("Resolved {} debt items", comparison.resolved.len())
        };
        improvements.push(line);
    }

    let before = &comparison.before_stats;
    let after = &comparison.after_stats;

    if after.total_score < before.total_score {
        improvements.push(format!(
            "Overall project debt reduced by {:.1}%",
            reduction_pct(before.total_score, after.total_score)
        ));
    }

    if before.average_complexity > after.average_complexity {
        improvements.push(format!(
            "Reduced average complexity by {:.0}%",
            reduction_pct(before.average_complexity, after.average_complexity)
        ));
    }

    if before.coverage_gaps > after.coverage_gaps {
        improvements.push(format!(
            "Improved test coverage for {} functions",
            before.coverage_gaps - after.coverage_gaps
        ));
    }

    if !comparison.improved.is_empty() {
        improvements.push(format!(
            "Improved {} existing debt items",
            comparison.improved.len()
        ));
    }

    improvements
}

/// Pure: Remaining issue lines.
pub fn format_remaining_issues(
    comparison: &ComparisonResult,
    thresholds: &PriorityThresholds,
) -> Vec<String> {
    let mut issues = Vec::new();

    let unresolved = unresolved_critical(comparison, thresholds).count();
    if unresolved > 0 {
        issues.push(format!("{} critical debt items still present", unresolved));
    }

    if !comparison.new_items.is_empty() {
        let critical_new = comparison.new_critical(thresholds).count();
        if critical_new > 0 {
            issues.push(format!("{} new critical debt items introduced", critical_new));
        } else {
            issues.push(format!(
                "{} new debt items introduced",
                comparison.new_items.len()
            ));
        }
    }

    if !comparison.regressed.is_empty() {
        issues.push(format!("{} items worsened", comparison.regressed.len()));
    }

    let remaining_critical = comparison.after_stats.priority_counts.critical;
    if remaining_critical > 0 {
        issues.push(format!("{} critical items remain", remaining_critical));
    }

    issues
}
