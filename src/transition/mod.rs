// First-Order Transition Estimation over Categorical Event Sequences
//
// This module turns an event log into a discrete-time Markov transition
// model: raw counts of adjacent activity pairs and their row-normalized
// probabilities.
//
// Key Properties:
// - Pairs never cross case boundaries
// - Probabilities are exactly empirical (no smoothing, no epsilon floor)
// - A source with no outgoing transitions has NO row ("absence means no
//   data", never "absence means zero")

mod estimator;
mod table;

pub use estimator::{estimate_transitions, top_transitions, TransitionModel};
pub use table::{Row, TransitionCounts, TransitionProbabilities};
