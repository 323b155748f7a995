//! Pure scoring logic: the weighted composite improvement score.
//!
//! Four sub-scores, each bounded to [0, 100]:
//! - Critical resolution: share of before-critical items that were resolved
//! - Overall improvement: relative reduction of the total score
//! - Complexity reduction: relative reduction of average complexity
//! - No new critical debt: 100 minus a fixed penalty per new critical item

use crate::comparison::{percent_of, reduction_pct, ComparisonResult};
use crate::config::{ComponentWeights, ValidationConfig};

use super::types::ScoreBreakdown;

/// Pure: Score a comparison.
pub fn score_comparison(comparison: &ComparisonResult, config: &ValidationConfig) -> ScoreBreakdown {
    let critical_resolution = critical_resolution_score(comparison, config);
    let overall_improvement = reduction_pct(
        comparison.before_stats.total_score,
        comparison.after_stats.total_score,
    )
    .min(100.0);
    let complexity_reduction = reduction_pct(
        comparison.before_stats.average_complexity,
        comparison.after_stats.average_complexity,
    )
    .min(100.0);
    let no_new_critical = no_new_critical_score(
        comparison.new_critical(&config.thresholds).count(),
        config.new_critical_penalty,
    );

    let mut breakdown = ScoreBreakdown {
        critical_resolution,
        overall_improvement,
        complexity_reduction,
        no_new_critical,
        composite: 0.0,
    };
    breakdown.composite = calculate_composite_score(&breakdown, &config.weights);
    breakdown
}

/// Pure: Share of before-critical items that were resolved.
///
/// With no critical items before, the sub-score is fully credited only when
/// the run made observable progress (something was resolved or improved);
/// a run that changed nothing earns no resolution credit.
pub fn critical_resolution_score(comparison: &ComparisonResult, config: &ValidationConfig) -> f64 {
    let before_critical = comparison.before_stats.priority_counts.critical;
    if before_critical == 0 {
        return if comparison.has_progress() { 100.0 } else { 0.0 };
    }

    let resolved_critical = comparison.resolved_critical(&config.thresholds).count();
    percent_of(resolved_critical as f64, before_critical as f64).clamp(0.0, 100.0)
}

/// Pure: Penalty schedule for newly introduced critical items.
pub fn no_new_critical_score(new_critical_count: usize, penalty_per_item: f64) -> f64 {
    (100.0 - penalty_per_item * new_critical_count as f64).clamp(0.0, 100.0)
}

/// Pure: Weighted sum of the sub-scores, clamped to [0, 100].
pub fn calculate_composite_score(breakdown: &ScoreBreakdown, weights: &ComponentWeights) -> f64 {
    let score = breakdown.critical_resolution * weights.critical_resolution
        + breakdown.overall_improvement * weights.overall_improvement
        + breakdown.complexity_reduction * weights.complexity_reduction
        + breakdown.no_new_critical * weights.no_new_critical;

    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
