// Per-node distribution distances: KL, Jensen–Shannon, Total Variation
//
// All three share one eligibility gate: the node must have a non-empty
// probability row in BOTH tables. Ineligible nodes return None and are left
// out of the averages.

use crate::comparison::diff::{probability_or, target_universe};
use crate::transition::Row;

/// Stand-in for a missing probability in MSE/MAE/TV
pub const MISSING_PROBABILITY: f64 = 0.0;

/// Stand-in for a missing probability in KL/JS, so no log of zero is taken
///
/// This is a floor, not Laplace smoothing: rows are not renormalized.
pub const PROBABILITY_FLOOR: f64 = 1e-10;

fn both_rows<'a>(
    out: Option<&'a Row<f64>>,
    reach: Option<&'a Row<f64>>,
) -> Option<(&'a Row<f64>, &'a Row<f64>)> {
    match (out, reach) {
        (Some(o), Some(r)) if !o.is_empty() && !r.is_empty() => Some((o, r)),
        _ => None,
    }
}

/// `p · ln(p / q)`, with the 0 · ln 0 = 0 convention for an explicit zero `p`
fn weighted_log_ratio(p: f64, q: f64) -> f64 {
    if p > 0.0 {
        p * (p / q).ln()
    } else {
        0.0
    }
}

/// KL divergence D(reach || out) for one node
///
/// `Σ_t reach(t) · ln(reach(t) / out(t))`, missing entries read as
/// [`PROBABILITY_FLOOR`]. Targets whose out-probability does not exceed the
/// floor are skipped instead of producing infinity. Returns `None` if the
/// node is ineligible or no target produced a term.
///
/// # Example
/// ```
/// use pitchseq::comparison::kl_divergence;
/// use std::collections::BTreeMap;
///
/// let out = BTreeMap::from([("SI".to_string(), 0.5), ("SL".to_string(), 0.5)]);
/// let reach = BTreeMap::from([("SI".to_string(), 0.5), ("SL".to_string(), 0.5)]);
///
/// assert_eq!(kl_divergence(Some(&out), Some(&reach)), Some(0.0));
/// ```
pub fn kl_divergence(out: Option<&Row<f64>>, reach: Option<&Row<f64>>) -> Option<f64> {
    let (out, reach) = both_rows(out, reach)?;

    let mut kl = 0.0;
    let mut has_term = false;

    for target in target_universe(Some(out), Some(reach)) {
        let out_prob = probability_or(Some(out), target, PROBABILITY_FLOOR);
        let reach_prob = probability_or(Some(reach), target, PROBABILITY_FLOOR);

        if out_prob > PROBABILITY_FLOOR {
            kl += weighted_log_ratio(reach_prob, out_prob);
            has_term = true;
        }
    }

    has_term.then_some(kl)
}

/// Jensen–Shannon divergence for one node (natural log)
///
/// For each target `m = (out + reach) / 2` and the term
/// `(out · ln(out / m) + reach · ln(reach / m)) / 2` is added when
/// `m > PROBABILITY_FLOOR`. Symmetric in its arguments.
pub fn js_divergence(out: Option<&Row<f64>>, reach: Option<&Row<f64>>) -> Option<f64> {
    let (out, reach) = both_rows(out, reach)?;

    let mut js = 0.0;
    let mut has_term = false;

    for target in target_universe(Some(out), Some(reach)) {
        let out_prob = probability_or(Some(out), target, PROBABILITY_FLOOR);
        let reach_prob = probability_or(Some(reach), target, PROBABILITY_FLOOR);
        let m = (out_prob + reach_prob) / 2.0;

        if m > PROBABILITY_FLOOR {
            js += (weighted_log_ratio(out_prob, m) + weighted_log_ratio(reach_prob, m)) / 2.0;
            has_term = true;
        }
    }

    has_term.then_some(js)
}

/// Total variation distance for one node: `Σ_t |out(t) − reach(t)| / 2`
///
/// Missing entries read as 0.0. An eligible node always yields a value,
/// including 0.0 for identical rows.
pub fn total_variation(out: Option<&Row<f64>>, reach: Option<&Row<f64>>) -> Option<f64> {
    let (out, reach) = both_rows(out, reach)?;

    let sum: f64 = target_universe(Some(out), Some(reach))
        .into_iter()
        .map(|target| {
            let out_prob = probability_or(Some(out), target, MISSING_PROBABILITY);
            let reach_prob = probability_or(Some(reach), target, MISSING_PROBABILITY);
            (out_prob - reach_prob).abs()
        })
        .sum();

    Some(sum / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, f64)]) -> Row<f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_gate_requires_both_rows() {
        let out = row(&[("SI", 1.0)]);
        let empty = Row::new();

        assert!(kl_divergence(Some(&out), None).is_none());
        assert!(js_divergence(None, Some(&out)).is_none());
        assert!(total_variation(Some(&out), Some(&empty)).is_none());
    }

    #[test]
    fn test_total_variation_example() {
        let a = row(&[("B", 0.6), ("C", 0.4)]);
        let b = row(&[("B", 0.3), ("C", 0.7)]);

        let tv = total_variation(Some(&a), Some(&b)).unwrap();
        assert!((tv - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_total_variation_identical_is_zero_not_none() {
        let a = row(&[("B", 1.0)]);
        assert_eq!(total_variation(Some(&a), Some(&a)), Some(0.0));
    }

    #[test]
    fn test_kl_skips_targets_missing_from_out() {
        // "C" only on the reach side → out reads as the floor → skipped
        let out = row(&[("B", 1.0)]);
        let reach = row(&[("B", 0.5), ("C", 0.5)]);

        let kl = kl_divergence(Some(&out), Some(&reach)).unwrap();
        let expected = 0.5 * (0.5f64 / 1.0).ln();
        assert!((kl - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kl_reach_missing_uses_floor() {
        let out = row(&[("B", 0.5), ("C", 0.5)]);
        let reach = row(&[("B", 1.0)]);

        let kl = kl_divergence(Some(&out), Some(&reach)).unwrap();
        let expected = 1.0 * (1.0f64 / 0.5).ln() + 1e-10 * (1e-10f64 / 0.5).ln();
        assert!((kl - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kl_no_valid_term_is_none() {
        // Out row holds only an explicit zero, which never exceeds the floor
        let out = row(&[("B", 0.0)]);
        let reach = row(&[("C", 1.0)]);
        assert!(kl_divergence(Some(&out), Some(&reach)).is_none());
    }

    #[test]
    fn test_kl_explicit_zero_reach_contributes_nothing() {
        let out = row(&[("B", 0.5), ("C", 0.5)]);
        let reach = row(&[("B", 1.0), ("C", 0.0)]);

        let kl = kl_divergence(Some(&out), Some(&reach)).unwrap();
        assert!(kl.is_finite());
        assert!((kl - 2.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_js_identical_rows_is_zero() {
        let a = row(&[("B", 0.25), ("C", 0.75)]);
        let js = js_divergence(Some(&a), Some(&a)).unwrap();
        assert!(js.abs() < 1e-15);
    }

    #[test]
    fn test_js_disjoint_rows_near_ln2() {
        let a = row(&[("B", 1.0)]);
        let b = row(&[("C", 1.0)]);
        let js = js_divergence(Some(&a), Some(&b)).unwrap();
        assert!((js - 2.0f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_js_symmetric() {
        let a = row(&[("B", 0.6), ("C", 0.4)]);
        let b = row(&[("B", 0.3), ("C", 0.7), ("D", 0.0)]);
        let ab = js_divergence(Some(&a), Some(&b)).unwrap();
        let ba = js_divergence(Some(&b), Some(&a)).unwrap();
        assert!((ab - ba).abs() < 1e-15);
    }
}
