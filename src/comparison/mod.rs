// Statistical Comparison of Two Empirical Transition Distributions
//
// Compares the transition table of one population ("out" at-bats) against
// another ("reach" at-bats) node by node, then aggregates.
//
// Metrics:
// - Per-pair probability differences (reach − out)
// - Per-node MSE / MAE over the node's target union, overall MSE
// - KL divergence D(reach || out), Jensen–Shannon divergence,
//   Total Variation distance, each averaged over eligible nodes
// - Chi-square homogeneity statistic per node from raw counts
//
// Conventions:
// - Every "average" is an unweighted arithmetic mean over nodes; busy and
//   rare nodes count the same.
// - Missing probabilities read as 0.0 for MSE/MAE/TV and as the 1e-10 floor
//   for KL/JS. The floor is not smoothing and is not configurable.
// - Significance uses a fixed critical value (3.84, the 1-df 5% point)
//   whatever the node's actual degrees of freedom.

mod chi_square;
mod compare;
mod config;
mod diff;
mod divergence;
mod report;

pub use chi_square::{chi_square_test, ChiSquareTest, DEFAULT_CRITICAL_VALUE};
pub use compare::{compare_transitions, ComparisonResult, TransitionDiff};
pub use config::ComparisonConfig;
pub use diff::{node_differences, PairDiff};
pub use divergence::{
    js_divergence, kl_divergence, total_variation, MISSING_PROBABILITY, PROBABILITY_FLOOR,
};
pub use report::CaseTotals;
