use crate::comparison::chi_square::{chi_square_test, ChiSquareTest};
use crate::comparison::config::ComparisonConfig;
use crate::comparison::diff::{mse_mae, node_differences, PairDiff};
use crate::comparison::divergence::{js_divergence, kl_divergence, total_variation};
use crate::transition::{TransitionCounts, TransitionProbabilities};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entry of [`ComparisonResult::largest_differences`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDiff {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub diff: PairDiff,
}

/// Everything the comparator reports for one out/reach pair of tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// source → target → probabilities and their difference
    pub transition_diffs: BTreeMap<String, BTreeMap<String, PairDiff>>,

    /// Mean squared difference per source node (nodes with ≥1 target)
    pub mse_by_node: BTreeMap<String, f64>,

    /// Mean absolute difference per source node (nodes with ≥1 target)
    pub mae_by_node: BTreeMap<String, f64>,

    /// KL divergence D(reach || out) per eligible node
    pub kl_by_node: BTreeMap<String, f64>,

    /// Jensen–Shannon divergence per eligible node
    pub js_by_node: BTreeMap<String, f64>,

    /// Total variation distance per eligible node
    pub tv_by_node: BTreeMap<String, f64>,

    /// Arithmetic mean of `mse_by_node`
    pub overall_mse: f64,

    pub avg_kl_divergence: f64,
    pub avg_js_divergence: f64,
    pub avg_tv_distance: f64,

    /// Chi-square results for nodes where the test could run (df > 0)
    pub chi_square: BTreeMap<String, ChiSquareTest>,

    /// Size of the node universe (sources in either table)
    pub total_nodes: usize,

    /// Nodes with at least one target in their universe
    pub nodes_with_transitions: usize,
}

impl ComparisonResult {
    /// Nodes flagged significant, largest chi-square first
    pub fn significant_nodes(&self) -> Vec<(&str, &ChiSquareTest)> {
        let mut nodes: Vec<_> = self
            .chi_square
            .iter()
            .filter(|(_, test)| test.significant)
            .map(|(node, test)| (node.as_str(), test))
            .collect();
        nodes.sort_by(|a, b| b.1.chi_square.total_cmp(&a.1.chi_square));
        nodes
    }

    /// Up to `k` transitions with the largest absolute probability difference
    pub fn largest_differences(&self, k: usize) -> Vec<TransitionDiff> {
        let mut diffs: Vec<TransitionDiff> = self
            .transition_diffs
            .iter()
            .flat_map(|(from, targets)| {
                targets.iter().map(move |(to, diff)| TransitionDiff {
                    from: from.clone(),
                    to: to.clone(),
                    diff: *diff,
                })
            })
            .collect();

        diffs.sort_by(|a, b| b.diff.abs_diff.total_cmp(&a.diff.abs_diff));
        diffs.truncate(k);
        diffs
    }
}

fn mean(values: &BTreeMap<String, f64>) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.values().sum::<f64>() / values.len() as f64
    }
}

/// Compare the "out" and "reach" transition tables
///
/// `counts` enables the chi-square test; pass `None` when only probability
/// tables are available.
///
/// # Example
/// ```
/// use pitchseq::comparison::{compare_transitions, ComparisonConfig};
/// use pitchseq::transition::TransitionProbabilities;
///
/// let out: TransitionProbabilities =
///     vec![("start", "SI", 0.5), ("start", "SL", 0.5)].into_iter().collect();
/// let reach: TransitionProbabilities =
///     vec![("start", "SI", 0.8), ("start", "SL", 0.2)].into_iter().collect();
///
/// let result = compare_transitions(&out, &reach, None, &ComparisonConfig::default());
/// assert!((result.overall_mse - 0.09).abs() < 1e-12);
/// assert!(result.chi_square.is_empty());
/// ```
pub fn compare_transitions(
    out: &TransitionProbabilities,
    reach: &TransitionProbabilities,
    counts: Option<(&TransitionCounts, &TransitionCounts)>,
    config: &ComparisonConfig,
) -> ComparisonResult {
    let nodes: BTreeSet<&str> = out.sources().chain(reach.sources()).collect();

    let mut result = ComparisonResult {
        total_nodes: nodes.len(),
        ..Default::default()
    };

    for &node in &nodes {
        let out_row = out.row(node);
        let reach_row = reach.row(node);

        let diffs = node_differences(out_row, reach_row);
        if let Some((mse, mae)) = mse_mae(&diffs) {
            result.mse_by_node.insert(node.to_string(), mse);
            result.mae_by_node.insert(node.to_string(), mae);
            result.transition_diffs.insert(node.to_string(), diffs);
        }

        if let Some(kl) = kl_divergence(out_row, reach_row) {
            result.kl_by_node.insert(node.to_string(), kl);
        }
        if let Some(js) = js_divergence(out_row, reach_row) {
            result.js_by_node.insert(node.to_string(), js);
        }
        if let Some(tv) = total_variation(out_row, reach_row) {
            result.tv_by_node.insert(node.to_string(), tv);
        }
    }

    result.nodes_with_transitions = result.mse_by_node.len();
    result.overall_mse = mean(&result.mse_by_node);
    result.avg_kl_divergence = mean(&result.kl_by_node);
    result.avg_js_divergence = mean(&result.js_by_node);
    result.avg_tv_distance = mean(&result.tv_by_node);

    if let Some((out_counts, reach_counts)) = counts {
        for &node in &nodes {
            match chi_square_test(
                out_counts.row(node),
                reach_counts.row(node),
                config.critical_value,
            ) {
                Some(test) => {
                    result.chi_square.insert(node.to_string(), test);
                }
                None => tracing::trace!(node, "chi-square test skipped"),
            }
        }
    }

    tracing::debug!(
        total_nodes = result.total_nodes,
        nodes_with_transitions = result.nodes_with_transitions,
        chi_square_nodes = result.chi_square.len(),
        overall_mse = result.overall_mse,
        "compared transition tables"
    );

    result
}
