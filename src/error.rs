//! Typed errors for log construction, estimation and comparison config

use thiserror::Error;

/// Errors from the transition estimator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimatorError {
    /// The event log contained zero cases
    #[error("Event log is empty: no cases to estimate transitions from")]
    EmptyLog,
}

/// Errors while building an event log from raw records
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Record {index} has an empty case identifier")]
    EmptyCaseId { index: usize },

    #[error("Record {index} in case '{case_id}' has an empty activity label")]
    EmptyActivity { index: usize, case_id: String },

    #[error("Case '{case_id}' has more than one event at position {order}")]
    DuplicateOrder { case_id: String, order: i64 },

    #[error("Failed to parse pitch log: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors for invalid comparison configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("critical_value must be a non-negative finite number, got {0}")]
    InvalidCriticalValue(f64),

    #[error("report_top_k must be >= 1")]
    ZeroTopK,

    #[error("min_report_probability must be in [0, 1], got {0}")]
    InvalidMinProbability(f64),
}
