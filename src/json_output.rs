//! JSON output format for transition models and their comparison

use crate::comparison::ComparisonResult;
use crate::saber::SaberSummary;
use crate::transition::{top_transitions, TransitionModel};
use serde::{Deserialize, Serialize};

/// Number of frequent transitions listed per population
const TOP_TRANSITIONS: usize = 10;

/// A frequently observed transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonTransition {
    pub from: String,
    pub to: String,
    pub count: u64,
}

/// One population's model as emitted in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPopulation {
    #[serde(flatten)]
    pub model: TransitionModel,
    /// Most frequent transitions, descending
    pub top_transitions: Vec<JsonTransition>,
}

impl JsonPopulation {
    pub fn new(model: TransitionModel) -> Self {
        let top_transitions = top_transitions(&model.counts, TOP_TRANSITIONS)
            .into_iter()
            .map(|(from, to, count)| JsonTransition { from, to, count })
            .collect();

        Self {
            model,
            top_transitions,
        }
    }
}

/// Summary counts of the input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonSummary {
    pub out_cases: usize,
    pub reach_cases: usize,
    /// At-bats whose outcome was neither out nor reach
    pub other_cases: usize,
    /// At-bats removed during preprocessing
    pub dropped_cases: usize,
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub summary: JsonSummary,
    pub out: JsonPopulation,
    pub reach: JsonPopulation,
    pub comparison: ComparisonResult,
    /// Rate stats over all pitches (if --saber enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saber: Option<SaberSummary>,
}

impl JsonOutput {
    pub fn new(out: TransitionModel, reach: TransitionModel, comparison: ComparisonResult) -> Self {
        let summary = JsonSummary {
            out_cases: out.cases,
            reach_cases: reach.cases,
            ..Default::default()
        };

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "pitchseq-json-v1".to_string(),
            summary,
            out: JsonPopulation::new(out),
            reach: JsonPopulation::new(reach),
            comparison,
            saber: None,
        }
    }

    /// Record at-bats that never reached either population
    pub fn set_excluded(&mut self, other: usize, dropped: usize) {
        self.summary.other_cases = other;
        self.summary.dropped_cases = dropped;
    }

    pub fn set_saber(&mut self, saber: SaberSummary) {
        self.saber = Some(saber);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
