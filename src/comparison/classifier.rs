//! Delta classification for items present in both snapshots.

use serde::Serialize;

use super::matcher::IdentityMap;
use super::percent_of;
use crate::config::ScoreTolerance;
use crate::snapshot::{DebtItem, IdentityKey};
use std::collections::BTreeSet;

/// Fate of a common item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    Improved,
    Regressed,
    Unchanged,
}

/// Score movement of one common item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDelta {
    pub key: IdentityKey,
    pub before: DebtItem,
    pub after: DebtItem,
    pub kind: DeltaKind,
    /// Absolute score movement; 0 when unchanged
    pub change: f64,
    /// `change / before × 100`; 0 when the before score is 0
    pub change_pct: f64,
}

/// Common items grouped by delta kind, each group in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedDeltas {
    pub improved: Vec<ItemDelta>,
    pub regressed: Vec<ItemDelta>,
    pub unchanged: Vec<ItemDelta>,
}

/// Classify a before/after score pair.
///
/// Returns the kind and the absolute change (0 for unchanged).
pub fn classify_scores(before: f64, after: f64, tolerance: &ScoreTolerance) -> (DeltaKind, f64) {
    let eps = tolerance.epsilon(before);
    if after < before - eps {
        (DeltaKind::Improved, before - after)
    } else if after > before + eps {
        (DeltaKind::Regressed, after - before)
    } else {
        (DeltaKind::Unchanged, 0.0)
    }
}

/// Classify every common key.
pub fn classify_common(
    common: &BTreeSet<IdentityKey>,
    before: &IdentityMap,
    after: &IdentityMap,
    tolerance: &ScoreTolerance,
) -> ClassifiedDeltas {
    let mut deltas = ClassifiedDeltas::default();

    let pairs = common
        .iter()
        .filter_map(|key| Some((key, before.get(key)?, after.get(key)?)));

    for (key, b, a) in pairs {
        let (kind, change) = classify_scores(b.score, a.score, tolerance);
        let delta = ItemDelta {
            key: key.clone(),
            before: b.clone(),
            after: a.clone(),
            kind,
            change,
            change_pct: percent_of(change, b.score),
        };
        match kind {
            DeltaKind::Improved => deltas.improved.push(delta),
            DeltaKind::Regressed => deltas.regressed.push(delta),
            DeltaKind::Unchanged => deltas.unchanged.push(delta),
        }
    }

    deltas
}
