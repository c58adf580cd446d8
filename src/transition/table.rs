use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse row of a transition table: target label → value
pub type Row<V> = BTreeMap<String, V>;

/// Observed adjacent-pair counts: source label → (target label → count)
///
/// Sparse adjacency structure. A missing source or target means "never
/// observed"; callers decide per metric what a missing entry stands for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionCounts {
    rows: BTreeMap<String, Row<u64>>,
}

impl TransitionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observed `from → to` transition
    pub(crate) fn record(&mut self, from: &str, to: &str) {
        *self
            .rows
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0) += 1;
    }

    /// Count for a single pair, `None` if the pair was never recorded
    pub fn get(&self, from: &str, to: &str) -> Option<u64> {
        self.rows.get(from)?.get(to).copied()
    }

    /// All targets observed from `from`
    pub fn row(&self, from: &str) -> Option<&Row<u64>> {
        self.rows.get(from)
    }

    /// Sum of outgoing counts from `from` (0 if the source is absent)
    pub fn row_total(&self, from: &str) -> u64 {
        self.rows
            .get(from)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Source labels in sorted order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row<u64>)> {
        self.rows.iter().map(|(from, row)| (from.as_str(), row))
    }

    /// Every `(from, to, count)` triple
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.rows.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, &count)| (from.as_str(), to.as_str(), count))
        })
    }

    /// Number of source rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of observed transitions across all rows
    pub fn total_transitions(&self) -> u64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }
}

impl From<BTreeMap<String, Row<u64>>> for TransitionCounts {
    fn from(rows: BTreeMap<String, Row<u64>>) -> Self {
        Self { rows }
    }
}

impl<F, T> FromIterator<(F, T, u64)> for TransitionCounts
where
    F: Into<String>,
    T: Into<String>,
{
    /// Collect `(from, to, count)` triples; repeated pairs are summed
    fn from_iter<I: IntoIterator<Item = (F, T, u64)>>(iter: I) -> Self {
        let mut rows: BTreeMap<String, Row<u64>> = BTreeMap::new();
        for (from, to, count) in iter {
            *rows
                .entry(from.into())
                .or_default()
                .entry(to.into())
                .or_insert(0) += count;
        }
        Self { rows }
    }
}

/// Row-normalized transition probabilities: source → (target → probability)
///
/// Each present row sums to 1.0 over the targets observed from that source,
/// not over the full activity universe. A source whose outgoing total is
/// zero has no row at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionProbabilities {
    rows: BTreeMap<String, Row<f64>>,
}

impl TransitionProbabilities {
    /// Derive probabilities from counts
    ///
    /// `p(from → to) = count(from → to) / Σ count(from → *)`. Rows whose
    /// total is zero are skipped rather than zero-filled.
    ///
    /// # Example
    /// ```
    /// use pitchseq::transition::{TransitionCounts, TransitionProbabilities};
    ///
    /// let counts: TransitionCounts = vec![("start", "SI", 3), ("start", "SL", 1)]
    ///     .into_iter()
    ///     .collect();
    /// let probs = TransitionProbabilities::from_counts(&counts);
    ///
    /// assert_eq!(probs.get("start", "SI"), Some(0.75));
    /// assert_eq!(probs.get("SI", "end"), None);
    /// ```
    pub fn from_counts(counts: &TransitionCounts) -> Self {
        let mut rows = BTreeMap::new();

        for (from, targets) in counts.iter() {
            let total: u64 = targets.values().sum();
            if total == 0 {
                continue;
            }

            let row: Row<f64> = targets
                .iter()
                .map(|(to, &count)| (to.clone(), count as f64 / total as f64))
                .collect();
            rows.insert(from.to_string(), row);
        }

        Self { rows }
    }

    /// Probability for a single pair, `None` if the pair is absent
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        self.rows.get(from)?.get(to).copied()
    }

    pub fn row(&self, from: &str) -> Option<&Row<f64>> {
        self.rows.get(from)
    }

    pub fn contains_source(&self, from: &str) -> bool {
        self.rows.contains_key(from)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row<f64>)> {
        self.rows.iter().map(|(from, row)| (from.as_str(), row))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.rows.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, &prob)| (from.as_str(), to.as_str(), prob))
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<BTreeMap<String, Row<f64>>> for TransitionProbabilities {
    fn from(rows: BTreeMap<String, Row<f64>>) -> Self {
        Self { rows }
    }
}

impl<F, T> FromIterator<(F, T, f64)> for TransitionProbabilities
where
    F: Into<String>,
    T: Into<String>,
{
    /// Collect `(from, to, probability)` triples as given; no normalization
    fn from_iter<I: IntoIterator<Item = (F, T, f64)>>(iter: I) -> Self {
        let mut rows: BTreeMap<String, Row<f64>> = BTreeMap::new();
        for (from, to, prob) in iter {
            rows.entry(from.into()).or_default().insert(to.into(), prob);
        }
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut counts = TransitionCounts::new();
        counts.record("SI", "SL");
        counts.record("SI", "SL");
        counts.record("SI", "end");

        assert_eq!(counts.get("SI", "SL"), Some(2));
        assert_eq!(counts.get("SI", "end"), Some(1));
        assert_eq!(counts.get("SL", "end"), None);
        assert_eq!(counts.row_total("SI"), 3);
        assert_eq!(counts.row_total("missing"), 0);
        assert_eq!(counts.total_transitions(), 3);
    }

    #[test]
    fn test_from_counts_skips_zero_rows() {
        let mut rows = BTreeMap::new();
        rows.insert(
            "A".to_string(),
            Row::from([("B".to_string(), 0u64), ("C".to_string(), 0)]),
        );
        rows.insert("D".to_string(), Row::from([("E".to_string(), 2u64)]));
        let counts = TransitionCounts::from(rows);

        let probs = TransitionProbabilities::from_counts(&counts);

        assert!(!probs.contains_source("A"));
        assert_eq!(probs.get("D", "E"), Some(1.0));
        assert_eq!(probs.len(), 1);
    }

    #[test]
    fn test_from_counts_keeps_zero_target_in_nonzero_row() {
        let counts: TransitionCounts = vec![("A", "B", 0), ("A", "C", 4)].into_iter().collect();
        let probs = TransitionProbabilities::from_counts(&counts);

        assert_eq!(probs.get("A", "B"), Some(0.0));
        assert_eq!(probs.get("A", "C"), Some(1.0));
    }

    #[test]
    fn test_pairs_iterates_every_entry() {
        let counts: TransitionCounts = vec![("A", "B", 1), ("A", "C", 2), ("B", "C", 3)]
            .into_iter()
            .collect();
        let pairs: Vec<_> = counts.pairs().collect();
        assert_eq!(pairs, vec![("A", "B", 1), ("A", "C", 2), ("B", "C", 3)]);
    }

    #[test]
    fn test_counts_serialize_as_nested_map() {
        let counts: TransitionCounts = vec![("start", "SI", 1)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"start":{"SI":1}}"#);
    }

    #[test]
    fn test_probabilities_roundtrip_from_json() {
        let probs: TransitionProbabilities =
            serde_json::from_str(r#"{"A":{"B":0.6,"C":0.4}}"#).unwrap();
        assert_eq!(probs.get("A", "B"), Some(0.6));
        assert_eq!(probs.sources().collect::<Vec<_>>(), vec!["A"]);
    }
}
