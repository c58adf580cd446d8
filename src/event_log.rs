//! Event logs: cases of ordered activity labels
//!
//! A case is one at-bat (or any equivalent unit) and holds its activity
//! labels in occurrence order. Labels are compared by exact string match;
//! nothing here normalizes them.

use crate::error::LogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One case: an identifier and its ordered activity labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    case_id: String,
    activities: Vec<String>,
}

impl Case {
    /// Create a case from its identifier and ordered labels
    pub fn new(case_id: impl Into<String>, activities: Vec<String>) -> Self {
        Self {
            case_id: case_id.into(),
            activities,
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    /// Activity labels in occurrence order
    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Collection of cases; order among cases carries no meaning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    cases: Vec<Case>,
}

impl EventLog {
    pub fn from_cases(cases: Vec<Case>) -> Self {
        Self { cases }
    }

    /// Build a log from flat `(case_id, order, activity)` events
    ///
    /// Events are grouped by case identifier and sorted by `order` within
    /// each case. Two events of one case sharing an `order` are rejected,
    /// since their relative position would be ambiguous.
    ///
    /// # Example
    /// ```
    /// use pitchseq::event_log::EventLog;
    ///
    /// let log = EventLog::from_events(vec![
    ///     ("ab-1", 1, "SL"),
    ///     ("ab-1", 0, "SI"),
    ///     ("ab-2", 0, "FF"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(log.len(), 2);
    /// let first = log.iter().find(|c| c.case_id() == "ab-1").unwrap();
    /// assert_eq!(first.activities(), ["SI".to_string(), "SL".to_string()]);
    /// ```
    pub fn from_events<I, C, A>(events: I) -> Result<Self, LogError>
    where
        I: IntoIterator<Item = (C, i64, A)>,
        C: Into<String>,
        A: Into<String>,
    {
        let mut grouped: BTreeMap<String, Vec<(i64, String)>> = BTreeMap::new();

        for (index, (case_id, order, activity)) in events.into_iter().enumerate() {
            let case_id = case_id.into();
            let activity = activity.into();

            if case_id.is_empty() {
                return Err(LogError::EmptyCaseId { index });
            }
            if activity.is_empty() {
                return Err(LogError::EmptyActivity { index, case_id });
            }

            grouped.entry(case_id).or_default().push((order, activity));
        }

        let mut cases = Vec::with_capacity(grouped.len());
        for (case_id, mut events) in grouped {
            events.sort_by_key(|(order, _)| *order);

            if let Some(pair) = events.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(LogError::DuplicateOrder {
                    case_id,
                    order: pair[0].0,
                });
            }

            let activities = events.into_iter().map(|(_, activity)| activity).collect();
            cases.push(Case::new(case_id, activities));
        }

        Ok(Self { cases })
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Case> {
        self.cases.iter()
    }

    /// Number of events summed over every case
    pub fn total_events(&self) -> usize {
        self.cases.iter().map(Case::len).sum()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Case;
    type IntoIter = std::slice::Iter<'a, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Case> for EventLog {
    fn from_iter<T: IntoIterator<Item = Case>>(iter: T) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}
