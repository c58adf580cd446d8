// Chi-square homogeneity test on raw transition counts
//
// For one source node, the out/reach counts per target form a 2×k table.
// The expected count of each cell splits the target's combined count in
// proportion to each population's row total.
//
// Known simplification: significance compares the statistic against a
// single fixed critical value (default 3.84, the 5% point at df = 1) no
// matter what df the node actually has. Large-k nodes are therefore
// flagged more readily than a proper chi-square survival function would.

use crate::transition::Row;
use serde::{Deserialize, Serialize};

/// Critical value for df = 1 at the 0.05 level
pub const DEFAULT_CRITICAL_VALUE: f64 = 3.84;

/// Result of the chi-square test for one source node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    /// Σ (observed − expected)² / expected over cells with expected > 0
    pub chi_square: f64,

    /// Number of targets with a nonzero count on either side, minus one
    pub df: usize,

    /// `chi_square > critical_value`
    pub significant: bool,
}

/// Run the chi-square test for one node
///
/// Returns `None` when either count row is absent or empty, when the
/// combined total is zero, when no expected cell is positive, or when the
/// degrees of freedom come out as zero (a single populated target).
///
/// # Example
/// ```
/// use pitchseq::comparison::{chi_square_test, DEFAULT_CRITICAL_VALUE};
/// use std::collections::BTreeMap;
///
/// let out = BTreeMap::from([("B".to_string(), 10u64)]);
/// let reach = BTreeMap::from([("B".to_string(), 0u64), ("C".to_string(), 5u64)]);
///
/// let test = chi_square_test(Some(&out), Some(&reach), DEFAULT_CRITICAL_VALUE).unwrap();
/// assert_eq!(test.df, 1);
/// assert!((test.chi_square - 15.0).abs() < 1e-9);
/// assert!(test.significant);
/// ```
pub fn chi_square_test(
    out: Option<&Row<u64>>,
    reach: Option<&Row<u64>>,
    critical_value: f64,
) -> Option<ChiSquareTest> {
    let (out, reach) = match (out, reach) {
        (Some(o), Some(r)) if !o.is_empty() && !r.is_empty() => (o, r),
        _ => return None,
    };

    let total_out: u64 = out.values().sum();
    let total_reach: u64 = reach.values().sum();
    let total_combined = total_out + total_reach;

    if total_combined == 0 {
        return None;
    }

    let out_share = total_out as f64 / total_combined as f64;
    let reach_share = total_reach as f64 / total_combined as f64;

    // Interleaved (out, reach) cells per populated target
    let mut observed: Vec<f64> = Vec::new();
    let mut expected: Vec<f64> = Vec::new();

    let targets = super::diff::target_universe(Some(out), Some(reach));
    for target in targets {
        let out_count = out.get(target).copied().unwrap_or(0);
        let reach_count = reach.get(target).copied().unwrap_or(0);

        if out_count == 0 && reach_count == 0 {
            continue;
        }

        let row_total = (out_count + reach_count) as f64;
        observed.extend([out_count as f64, reach_count as f64]);
        expected.extend([row_total * out_share, row_total * reach_share]);
    }

    if observed.is_empty() || !expected.iter().any(|&e| e > 0.0) {
        return None;
    }

    let chi_square: f64 = observed
        .iter()
        .zip(&expected)
        .filter(|(_, &e)| e > 0.0)
        .map(|(&o, &e)| (o - e).powi(2) / e)
        .sum();

    let df = observed.len() / 2 - 1;
    if df == 0 {
        return None;
    }

    Some(ChiSquareTest {
        chi_square,
        df,
        significant: chi_square > critical_value,
    })
}
