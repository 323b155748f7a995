//! Per-snapshot aggregate statistics.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{Priority, ValidationConfig};
use crate::snapshot::DebtItem;

/// Coverage below this percentage counts as a coverage gap.
pub const COVERAGE_GAP_THRESHOLD: f64 = 50.0;

/// Item counts per priority bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    fn record(&mut self, priority: Priority) {
        match priority {
            Priority::Critical => self.critical += 1,
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    /// Items at high priority or above.
    pub fn high_or_above(&self) -> usize {
        self.critical + self.high
    }
}

/// Aggregates of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotStats {
    pub item_count: usize,
    pub total_score: f64,
    pub priority_counts: PriorityCounts,
    pub average_score: f64,
    /// Mean over items that report a non-zero complexity
    pub average_complexity: f64,
    pub coverage_gaps: usize,
    /// Score per category tag; an item adds its full score to each of its tags
    pub category_scores: BTreeMap<String, f64>,
}

/// Aggregate a snapshot's (already identity-merged) items.
pub fn aggregate<'a>(
    items: impl IntoIterator<Item = &'a DebtItem>,
    config: &ValidationConfig,
) -> SnapshotStats {
    let mut stats = SnapshotStats::default();
    let mut complexity_sum = 0.0;
    let mut complexity_count = 0usize;

    for item in items {
        stats.item_count += 1;
        stats.total_score += item.score;
        stats
            .priority_counts
            .record(item.priority(&config.thresholds));

        if item.complexity > 0.0 {
            complexity_sum += item.complexity;
            complexity_count += 1;
        }
        if item.coverage_or(config.assumed_coverage) < COVERAGE_GAP_THRESHOLD {
            stats.coverage_gaps += 1;
        }
        for category in &item.categories {
            *stats.category_scores.entry(category.clone()).or_insert(0.0) += item.score;
        }
    }

    stats.average_score = mean(stats.total_score, stats.item_count);
    stats.average_complexity = mean(complexity_sum, complexity_count);
    stats
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ItemIdentity;

    fn item(function: &str, score: f64, complexity: f64) -> DebtItem {
        DebtItem::new(ItemIdentity::new("a.rs", function, None), score).with_complexity(complexity)
    }

    #[test]
    fn test_empty_snapshot_is_all_zero() {
        let stats = aggregate(&Vec::<DebtItem>::new(), &ValidationConfig::default());
        assert_eq!(stats, SnapshotStats::default());
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.average_complexity, 0.0);
    }

    #[test]
    fn test_priority_buckets_and_averages() {
        let items = vec![
            item("a", 9.0, 10.0),
            item("b", 6.5, 0.0),
            item("c", 4.0, 20.0),
            item("d", 0.5, 0.0),
        ];
        let stats = aggregate(&items, &ValidationConfig::default());

        assert_eq!(stats.item_count, 4);
        assert_eq!(stats.total_score, 20.0);
        assert_eq!(stats.average_score, 5.0);
        assert_eq!(
            stats.priority_counts,
            PriorityCounts {
                critical: 1,
                high: 1,
                medium: 1,
                low: 1
            }
        );
        assert_eq!(stats.priority_counts.high_or_above(), 2);
        // Items without complexity don't dilute the average
        assert_eq!(stats.average_complexity, 15.0);
    }

    #[test]
    fn test_multi_category_items_count_fully_in_each() {
        let items = vec![
            item("a", 3.0, 0.0)
                .with_category("complexity")
                .with_category("coverage_gap"),
            item("b", 2.0, 0.0).with_category("complexity"),
            item("c", 1.0, 0.0),
        ];
        let stats = aggregate(&items, &ValidationConfig::default());

        assert_eq!(stats.category_scores.get("complexity"), Some(&5.0));
        assert_eq!(stats.category_scores.get("coverage_gap"), Some(&3.0));
        assert_eq!(stats.category_scores.len(), 2);
    }

    #[test]
    fn test_coverage_gaps_use_assumed_coverage_for_missing() {
        let items = vec![
            item("a", 1.0, 0.0).with_coverage(20.0),
            item("b", 1.0, 0.0),
        ];
        let stats = aggregate(&items, &ValidationConfig::default());
        assert_eq!(stats.coverage_gaps, 1);

        let pessimistic = ValidationConfig {
            assumed_coverage: 0.0,
            ..ValidationConfig::default()
        };
        assert_eq!(aggregate(&items, &pessimistic).coverage_gaps, 2);
    }
}
