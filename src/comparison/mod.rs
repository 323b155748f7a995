//! Before/after snapshot comparison.
//!
//! # Module Structure
//!
//! - `matcher` - Identity maps and the resolved/new/common partition
//! - `classifier` - Improved/regressed/unchanged deltas for common items
//! - `aggregate` - Per-snapshot totals, priority counts and category sums
//!
//! Each stage is a pure function of its inputs; [`compare_snapshots`] runs
//! them in order and returns a [`ComparisonResult`] that lives only for the
//! current before/after pair.

pub mod aggregate;
pub mod classifier;
pub mod matcher;

pub use aggregate::{aggregate, PriorityCounts, SnapshotStats};
pub use classifier::{classify_common, classify_scores, DeltaKind, ItemDelta};
pub use matcher::{build_identity_map, match_snapshots, partition_keys, IdentityMap, KeyPartition};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::config::{MatchSensitivity, PriorityThresholds, ValidationConfig};
use crate::snapshot::{DebtItem, IdentityKey, Snapshot};

/// An item that exists on only one side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedItem {
    pub key: IdentityKey,
    pub item: DebtItem,
}

/// Per-category score sums before and after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub before: f64,
    pub after: f64,
    /// `after - before`; negative means the category shrank
    pub change: f64,
}

/// Everything derived from one before/after pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub sensitivity: MatchSensitivity,
    pub resolved: Vec<KeyedItem>,
    pub new_items: Vec<KeyedItem>,
    pub improved: Vec<ItemDelta>,
    pub regressed: Vec<ItemDelta>,
    pub unchanged: Vec<ItemDelta>,
    pub before_stats: SnapshotStats,
    pub after_stats: SnapshotStats,
    pub before_reported_total: Option<f64>,
    pub after_reported_total: Option<f64>,
}

impl ComparisonResult {
    /// At least one item was resolved or improved.
    pub fn has_progress(&self) -> bool {
        !self.resolved.is_empty() || !self.improved.is_empty()
    }

    pub fn resolved_critical<'a>(
        &'a self,
        thresholds: &'a PriorityThresholds,
    ) -> impl Iterator<Item = &'a KeyedItem> + 'a {
        self.resolved
            .iter()
            .filter(move |k| thresholds.is_critical(k.item.score))
    }

    pub fn new_critical<'a>(
        &'a self,
        thresholds: &'a PriorityThresholds,
    ) -> impl Iterator<Item = &'a KeyedItem> + 'a {
        self.new_items
            .iter()
            .filter(move |k| thresholds.is_critical(k.item.score))
    }

    /// Category score changes over the union of both snapshots' tags.
    pub fn category_changes(&self) -> BTreeMap<String, CategoryChange> {
        let before = &self.before_stats.category_scores;
        let after = &self.after_stats.category_scores;
        let tags: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

        tags.into_iter()
            .map(|tag| {
                let b = before.get(tag).copied().unwrap_or(0.0);
                let a = after.get(tag).copied().unwrap_or(0.0);
                (
                    tag.clone(),
                    CategoryChange {
                        before: b,
                        after: a,
                        change: a - b,
                    },
                )
            })
            .collect()
    }
}

/// Run the comparison pipeline: match, classify, aggregate.
pub fn compare_snapshots(
    before: &Snapshot,
    after: &Snapshot,
    config: &ValidationConfig,
) -> ComparisonResult {
    info!(
        before = %before.source_name,
        after = %after.source_name,
        before_items = before.len(),
        after_items = after.len(),
        "Comparing debt snapshots"
    );

    let matched = match_snapshots(before, after, config.matching);
    let deltas = classify_common(
        &matched.partition.common,
        &matched.before,
        &matched.after,
        &config.tolerance,
    );

    debug!(
        improved = deltas.improved.len(),
        regressed = deltas.regressed.len(),
        unchanged = deltas.unchanged.len(),
        "Classified common items"
    );

    let before_stats = aggregate(matched.before.values(), config);
    let after_stats = aggregate(matched.after.values(), config);

    ComparisonResult {
        sensitivity: config.matching,
        resolved: keyed_items(&matched.partition.resolved, &matched.before),
        new_items: keyed_items(&matched.partition.new, &matched.after),
        improved: deltas.improved,
        regressed: deltas.regressed,
        unchanged: deltas.unchanged,
        before_stats,
        after_stats,
        before_reported_total: before.reported_total,
        after_reported_total: after.reported_total,
    }
}

fn keyed_items(keys: &BTreeSet<IdentityKey>, map: &IdentityMap) -> Vec<KeyedItem> {
    keys.iter()
        .filter_map(|key| {
            map.get(key).map(|item| KeyedItem {
                key: key.clone(),
                item: item.clone(),
            })
        })
        .collect()
}

/// `part / whole × 100`, or 0 when `whole` is zero, negative or non-finite.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if !whole.is_finite() || whole <= 0.0 || !part.is_finite() {
        return 0.0;
    }
    part / whole * 100.0
}

/// Relative reduction from `before` to `after` in percent, floored at 0.
pub fn reduction_pct(before: f64, after: f64) -> f64 {
    percent_of(before - after, before).max(0.0)
}
