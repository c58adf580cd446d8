use crate::error::EstimatorError;
use crate::event_log::EventLog;
use crate::transition::table::{TransitionCounts, TransitionProbabilities};
use serde::{Deserialize, Serialize};

/// Transition model estimated from one population's event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionModel {
    /// Row-normalized transition probabilities
    pub probabilities: TransitionProbabilities,

    /// Raw adjacent-pair counts the probabilities were derived from
    pub counts: TransitionCounts,

    /// Number of cases in the source log
    pub cases: usize,
}

/// Estimate first-order transition counts and probabilities from a log
///
/// For every case, each adjacent pair `(activities[i], activities[i + 1])`
/// increments `counts[from][to]`. Cases of length 0 or 1 contribute nothing.
/// Probabilities are then `counts[from][to] / Σ counts[from][*]`.
///
/// # Errors
/// `EstimatorError::EmptyLog` if the log has zero cases. A log whose cases
/// are all too short to produce a pair is *not* an error; it yields empty
/// tables.
///
/// # Example
/// ```
/// use pitchseq::event_log::{Case, EventLog};
/// use pitchseq::transition::estimate_transitions;
///
/// let log = EventLog::from_cases(vec![
///     Case::new("1", vec!["start".into(), "SI".into(), "end".into()]),
///     Case::new("2", vec!["start".into(), "SL".into(), "end".into()]),
/// ]);
///
/// let model = estimate_transitions(&log).unwrap();
/// assert_eq!(model.counts.get("start", "SI"), Some(1));
/// assert_eq!(model.probabilities.get("start", "SL"), Some(0.5));
/// assert_eq!(model.probabilities.get("SI", "end"), Some(1.0));
/// ```
pub fn estimate_transitions(log: &EventLog) -> Result<TransitionModel, EstimatorError> {
    if log.is_empty() {
        return Err(EstimatorError::EmptyLog);
    }

    let mut counts = TransitionCounts::new();

    for case in log {
        for pair in case.activities().windows(2) {
            counts.record(&pair[0], &pair[1]);
        }
    }

    let probabilities = TransitionProbabilities::from_counts(&counts);

    tracing::debug!(
        cases = log.len(),
        sources = counts.len(),
        transitions = counts.total_transitions(),
        "estimated transition model"
    );

    Ok(TransitionModel {
        probabilities,
        counts,
        cases: log.len(),
    })
}

/// Most frequent transitions (useful for spotting a pitcher's go-to sequences)
///
/// Sorted by count descending; equal counts fall back to `(from, to)`
/// ascending so the output is stable.
pub fn top_transitions(counts: &TransitionCounts, k: usize) -> Vec<(String, String, u64)> {
    let mut pairs: Vec<_> = counts
        .pairs()
        .map(|(from, to, count)| (from.to_string(), to.to_string(), count))
        .collect();

    pairs.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| (&a.0, &a.1).cmp(&(&b.0, &b.1))));

    pairs.into_iter().take(k).collect()
}
