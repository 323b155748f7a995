//! Identity matching between two snapshots.
//!
//! Items are keyed by [`IdentityKey`]; the key universe is then partitioned
//! into resolved, new and common keys. All maps and sets are ordered, so the
//! partition is identical for identical input.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::MatchSensitivity;
use crate::snapshot::{DebtItem, IdentityKey, Snapshot};

/// Identity → item lookup for one snapshot.
pub type IdentityMap = BTreeMap<IdentityKey, DebtItem>;

/// Disjoint key sets covering `before_keys ∪ after_keys`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPartition {
    /// Present before, absent after
    pub resolved: BTreeSet<IdentityKey>,
    /// Absent before, present after
    pub new: BTreeSet<IdentityKey>,
    /// Present in both
    pub common: BTreeSet<IdentityKey>,
}

impl KeyPartition {
    pub fn total(&self) -> usize {
        self.resolved.len() + self.new.len() + self.common.len()
    }
}

/// Both lookup maps plus their key partition.
#[derive(Debug, Clone)]
pub struct MatchedSnapshots {
    pub before: IdentityMap,
    pub after: IdentityMap,
    pub partition: KeyPartition,
}

/// Key both snapshots with the same sensitivity and partition the keys.
pub fn match_snapshots(
    before: &Snapshot,
    after: &Snapshot,
    sensitivity: MatchSensitivity,
) -> MatchedSnapshots {
    let before_map = build_identity_map(&before.items, sensitivity);
    let after_map = build_identity_map(&after.items, sensitivity);
    let partition = partition_keys(&before_map, &after_map);

    debug!(
        resolved = partition.resolved.len(),
        new = partition.new.len(),
        common = partition.common.len(),
        "Matched snapshot identities"
    );

    MatchedSnapshots {
        before: before_map,
        after: after_map,
        partition,
    }
}

/// Build an identity map, merging items whose keys collide.
pub fn build_identity_map(items: &[DebtItem], sensitivity: MatchSensitivity) -> IdentityMap {
    let mut map = IdentityMap::new();
    for item in items {
        let key = item.identity.key(sensitivity);
        match map.get_mut(&key) {
            Some(existing) => merge_into(existing, item),
            None => {
                map.insert(key, item.clone());
            }
        }
    }
    map
}

/// Merge a colliding finding into the aggregate entity at the same location.
///
/// Scores add up; complexity keeps the maximum; coverage keeps the lowest
/// reported value; categories are unioned in first-seen order; the first
/// description wins; the identity keeps the smallest reported line.
pub fn merge_into(existing: &mut DebtItem, incoming: &DebtItem) {
    existing.score += incoming.score;
    existing.complexity = existing.complexity.max(incoming.complexity);
    existing.coverage = match (existing.coverage, incoming.coverage) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    for category in &incoming.categories {
        if !existing.categories.contains(category) {
            existing.categories.push(category.clone());
        }
    }
    if existing.description.is_none() {
        existing.description = incoming.description.clone();
    }
    existing.identity.line = match (existing.identity.line, incoming.identity.line) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
}

/// Partition the union of both key sets.
pub fn partition_keys(before: &IdentityMap, after: &IdentityMap) -> KeyPartition {
    let before_keys: BTreeSet<_> = before.keys().cloned().collect();
    let after_keys: BTreeSet<_> = after.keys().cloned().collect();

    KeyPartition {
        resolved: before_keys.difference(&after_keys).cloned().collect(),
        new: after_keys.difference(&before_keys).cloned().collect(),
        common: before_keys.intersection(&after_keys).cloned().collect(),
    }
}
