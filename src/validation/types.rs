//! Validation report data structures.
//!
//! Every type here is serialized into the report document and read back
//! when a previous report is supplied for trend analysis, so all optional
//! and collection fields are defaulted on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::comparison::{CategoryChange, SnapshotStats};

/// Outcome of one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Complete,
    Incomplete,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Complete => "complete",
            Status::Incomplete => "incomplete",
            Status::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Gap severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// One reason the improvement was judged insufficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapDetail {
    pub description: String,
    pub location: String,
    pub severity: Severity,
    pub suggested_fix: String,
    /// Score before the change; `None` for items that did not exist
    #[serde(default)]
    pub original_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score: Option<f64>,
}

/// Aggregate view of one snapshot as written into the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSummary {
    pub total_items: usize,
    pub critical_items: usize,
    /// Items at or above the high threshold (critical included)
    pub high_priority_items: usize,
    pub medium_priority_items: usize,
    pub low_priority_items: usize,
    pub average_score: f64,
    pub total_score: f64,
    pub average_complexity: f64,
    pub coverage_gaps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_total: Option<f64>,
}

impl SnapshotSummary {
    pub fn from_stats(stats: &SnapshotStats, reported_total: Option<f64>) -> Self {
        let counts = stats.priority_counts;
        Self {
            total_items: stats.item_count,
            critical_items: counts.critical,
            high_priority_items: counts.high_or_above(),
            medium_priority_items: counts.medium,
            low_priority_items: counts.low,
            average_score: round_to(stats.average_score, 2),
            total_score: round_to(stats.total_score, 2),
            average_complexity: round_to(stats.average_complexity, 2),
            coverage_gaps: stats.coverage_gaps,
            reported_total,
        }
    }
}

/// The four weighted sub-scores and their composite, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBreakdown {
    pub critical_resolution: f64,
    pub overall_improvement: f64,
    pub complexity_reduction: f64,
    pub no_new_critical: f64,
    pub composite: f64,
}

/// Fix-attempt counters supplied by the calling pipeline, echoed verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAttempts {
    pub successful: u32,
    pub failed: u32,
    pub total: u32,
}

impl FixAttempts {
    /// Counters are echoed only when the pipeline supplied at least one.
    ///
    /// A missing total defaults to `successful + failed`, saturating at `u32::MAX`.
    pub fn from_counts(
        successful: Option<u32>,
        failed: Option<u32>,
        total: Option<u32>,
    ) -> Option<Self> {
        if successful.is_none() && failed.is_none() && total.is_none() {
            return None;
        }
        let successful = successful.unwrap_or(0);
        let failed = failed.unwrap_or(0);
        Some(Self {
            successful,
            failed,
            total: total.unwrap_or_else(|| successful.saturating_add(failed)),
        })
    }
}

/// Direction of the completion score relative to a previous attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Progress,
    Stable,
    Regression,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Progress => "progress",
            TrendDirection::Stable => "stable",
            TrendDirection::Regression => "regression",
        };
        f.write_str(s)
    }
}

/// Trend analysis comparing the current run to a previous report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub previous_completion: Option<f64>,
    pub change: Option<f64>,
    pub recommendation: String,
}

/// Validation report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub completion_percentage: f64,
    pub status: Status,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub remaining_issues: Vec<String>,
    #[serde(default)]
    pub gaps: BTreeMap<String, GapDetail>,
    #[serde(default)]
    pub before_summary: SnapshotSummary,
    #[serde(default)]
    pub after_summary: SnapshotSummary,
    #[serde(default)]
    pub score_breakdown: ScoreBreakdown,
    #[serde(default)]
    pub category_changes: BTreeMap<String, CategoryChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_attempts: Option<FixAttempts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_analysis: Option<TrendAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    /// Minimal valid report for a run that could not be evaluated.
    pub fn failure(issue: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            completion_percentage: 0.0,
            status: Status::Failed,
            improvements: Vec::new(),
            remaining_issues: vec![issue.into()],
            gaps: BTreeMap::new(),
            before_summary: SnapshotSummary::default(),
            after_summary: SnapshotSummary::default(),
            score_breakdown: ScoreBreakdown::default(),
            category_changes: BTreeMap::new(),
            fix_attempts: None,
            trend_analysis: None,
            attempt_number: None,
            error: Some(error.into()),
        }
    }

    pub fn with_fix_attempts(mut self, attempts: Option<FixAttempts>) -> Self {
        self.fix_attempts = attempts;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
