//! Status determination and gap diagnostics.
//!
//! Gaps point at the specific items that kept a run from completing. Each
//! gap kind is capped, candidates are ranked by score (ties broken by
//! identity), and gap ids are built from the item location so the same
//! input always yields the same map.

use std::collections::BTreeMap;

use crate::comparison::{ComparisonResult, ItemDelta, KeyedItem};
use crate::config::{GapLimits, PriorityThresholds, StatusThresholds, ValidationConfig};
use crate::snapshot::IdentityKey;

use super::types::{GapDetail, Severity, Status};

const CRITICAL_REMAINING: &str = "critical_debt_remaining";
const INSUFFICIENT_REFACTORING: &str = "insufficient_refactoring";
const REGRESSION_DETECTED: &str = "regression_detected";
const NEW_CRITICAL: &str = "new_critical_debt";

/// Pure: Map a composite score to a status.
pub fn determine_status(score: f64, thresholds: &StatusThresholds) -> Status {
    if score >= thresholds.complete_at {
        Status::Complete
    } else if score >= thresholds.incomplete_at {
        Status::Incomplete
    } else {
        Status::Failed
    }
}

/// Pure: Build the gap map for a run with the given status.
///
/// Complete runs have no gaps.
pub fn build_gaps(
    comparison: &ComparisonResult,
    status: Status,
    config: &ValidationConfig,
) -> BTreeMap<String, GapDetail> {
    if status == Status::Complete {
        return BTreeMap::new();
    }

    let thresholds = &config.thresholds;
    let limits: &GapLimits = &config.gaps;
    let mut gaps = BTreeMap::new();

    let unresolved = top_deltas(unresolved_critical(comparison, thresholds), limits.critical_remaining);
    gaps.extend(unresolved.into_iter().map(|d| {
        (
            gap_id(CRITICAL_REMAINING, &d.key),
            critical_remaining_gap(d),
        )
    }));

    let partial = top_deltas(
        comparison
            .improved
            .iter()
            .filter(|d| d.after.score >= thresholds.high),
        limits.insufficient_reduction,
    );
    gaps.extend(partial.into_iter().map(|d| {
        (
            gap_id(INSUFFICIENT_REFACTORING, &d.key),
            insufficient_refactoring_gap(d, thresholds),
        )
    }));

    let regressions = top_deltas(comparison.regressed.iter(), limits.regressions);
    gaps.extend(regressions.into_iter().map(|d| {
        (
            gap_id(REGRESSION_DETECTED, &d.key),
            regression_gap(d, thresholds),
        )
    }));

    let mut new_critical: Vec<&KeyedItem> = comparison.new_critical(thresholds).collect();
    new_critical.sort_by(|a, b| b.item.score.total_cmp(&a.item.score).then_with(|| a.key.cmp(&b.key)));
    gaps.extend(
        new_critical
            .into_iter()
            .take(limits.new_critical)
            .map(|k| (gap_id(NEW_CRITICAL, &k.key), new_critical_gap(k))),
    );

    gaps
}

/// Pure: Unchanged items that are critical both before and after.
pub fn unresolved_critical<'a>(
    comparison: &'a ComparisonResult,
    thresholds: &'a PriorityThresholds,
) -> impl Iterator<Item = &'a ItemDelta> + 'a {
    comparison.unchanged.iter().filter(move |d| {
        thresholds.is_critical(d.before.score) && thresholds.is_critical(d.after.score)
    })
}

/// Pure: Severity of a regression, scaled by the resulting score.
pub fn regression_severity(after_score: f64, thresholds: &PriorityThresholds) -> Severity {
    if after_score >= thresholds.critical {
        Severity::High
    } else if after_score >= thresholds.high {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn gap_id(kind: &str, key: &IdentityKey) -> String {
    format!("{}:{}", kind, key)
}

/// Highest after-score first, then identity order.
fn top_deltas<'a>(deltas: impl Iterator<Item = &'a ItemDelta>, limit: usize) -> Vec<&'a ItemDelta> {
    let mut ranked: Vec<&ItemDelta> = deltas.collect();
    ranked.sort_by(|a, b| {
        b.after
            .score
            .total_cmp(&a.after.score)
            .then_with(|| a.key.cmp(&b.key))
    });
    ranked.truncate(limit);
    ranked
}

fn critical_remaining_gap(delta: &ItemDelta) -> GapDetail {
    let what = delta
        .after
        .description
        .as_deref()
        .or(delta.before.description.as_deref())
        .unwrap_or("Complex function");
    GapDetail {
        description: format!("High-priority debt item still present: {}", what),
        location: delta.after.identity.to_string(),
        severity: Severity::Critical,
        suggested_fix: "Apply functional programming patterns to reduce complexity".to_string(),
        original_score: Some(delta.before.score),
        current_score: Some(delta.after.score),
        target_score: None,
    }
}

fn insufficient_refactoring_gap(delta: &ItemDelta, thresholds: &PriorityThresholds) -> GapDetail {
    let severity = if delta.after.score >= thresholds.critical {
        Severity::High
    } else {
        Severity::Medium
    };
    GapDetail {
        description: "Function complexity reduced but still above threshold".to_string(),
        location: delta.after.identity.to_string(),
        severity,
        suggested_fix: "Extract helper functions using pure functional patterns".to_string(),
        original_score: Some(delta.before.score),
        current_score: Some(delta.after.score),
        target_score: Some(thresholds.medium),
    }
}

fn regression_gap(delta: &ItemDelta, thresholds: &PriorityThresholds) -> GapDetail {
    GapDetail {
        description: "Debt score increased during refactoring".to_string(),
        location: delta.after.identity.to_string(),
        severity: regression_severity(delta.after.score, thresholds),
        suggested_fix: "Review changes and simplify the implementation".to_string(),
        original_score: Some(delta.before.score),
        current_score: Some(delta.after.score),
        target_score: None,
    }
}

fn new_critical_gap(keyed: &KeyedItem) -> GapDetail {
    GapDetail {
        description: "New critical debt introduced".to_string(),
        location: keyed.item.identity.to_string(),
        severity: Severity::Critical,
        suggested_fix: "Remove or simplify the newly added complexity".to_string(),
        original_score: None,
        current_score: Some(keyed.item.score),
        target_score: None,
    }
}
