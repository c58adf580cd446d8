use crate::comparison::divergence::MISSING_PROBABILITY;
use crate::transition::Row;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Probability of one `from → to` pair under both populations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairDiff {
    /// Probability in the "out" population (0.0 if unobserved)
    pub out: f64,

    /// Probability in the "reach" population (0.0 if unobserved)
    pub reach: f64,

    /// Signed difference, reach − out
    pub diff: f64,

    pub abs_diff: f64,
}

impl PairDiff {
    pub fn new(out: f64, reach: f64) -> Self {
        let diff = reach - out;
        Self {
            out,
            reach,
            diff,
            abs_diff: diff.abs(),
        }
    }
}

/// Union of target labels over two optional rows, sorted
pub(crate) fn target_universe<'a, V>(
    out: Option<&'a Row<V>>,
    reach: Option<&'a Row<V>>,
) -> BTreeSet<&'a str> {
    out.into_iter()
        .chain(reach)
        .flat_map(|row| row.keys().map(String::as_str))
        .collect()
}

/// Probability of `target` in `row`, or `default` when row or entry is absent
pub(crate) fn probability_or(row: Option<&Row<f64>>, target: &str, default: f64) -> f64 {
    row.and_then(|r| r.get(target)).copied().unwrap_or(default)
}

/// Per-pair differences for one source node
///
/// Targets present on only one side are zero-filled on the other.
pub fn node_differences(
    out: Option<&Row<f64>>,
    reach: Option<&Row<f64>>,
) -> BTreeMap<String, PairDiff> {
    target_universe(out, reach)
        .into_iter()
        .map(|target| {
            let out_prob = probability_or(out, target, MISSING_PROBABILITY);
            let reach_prob = probability_or(reach, target, MISSING_PROBABILITY);
            (target.to_string(), PairDiff::new(out_prob, reach_prob))
        })
        .collect()
}

/// Mean squared and mean absolute difference over a node's pairs
///
/// `None` when the node has no targets at all.
pub(crate) fn mse_mae(diffs: &BTreeMap<String, PairDiff>) -> Option<(f64, f64)> {
    if diffs.is_empty() {
        return None;
    }

    let n = diffs.len() as f64;
    let squared: f64 = diffs.values().map(|d| d.diff * d.diff).sum();
    let absolute: f64 = diffs.values().map(|d| d.abs_diff).sum();

    Some((squared / n, absolute / n))
}
