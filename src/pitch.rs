//! Pitch-by-pitch records → per-outcome event logs
//!
//! Shapes already-loaded pitch rows into the two populations the comparator
//! works on: at-bats that ended in an out and at-bats where the batter
//! reached base. Each pitch becomes an activity label `"{pitch_type} - {result}"`,
//! and each at-bat is optionally bracketed with start/end sentinel labels.

use crate::error::LogError;
use crate::event_log::{Case, EventLog};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// One pitch as delivered by the upstream data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    /// Plate-appearance identifier; all pitches of one at-bat share it
    pub at_bat_id: String,

    /// Position of the pitch within the at-bat
    pub pitch_number: i64,

    /// Pitch type code (e.g. "SI", "SL"); missing values poison the at-bat
    #[serde(default)]
    pub pitch_type: Option<String>,

    /// Pitch call (e.g. "ball", "swinging_strike", "hit_into_play")
    #[serde(default)]
    pub description: Option<String>,

    /// Plate-appearance result, normally only set on the final pitch
    #[serde(default)]
    pub events: Option<String>,
}

/// How an at-bat ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtBatOutcome {
    /// Batter was put out
    Out,
    /// Batter reached base
    Reach,
    /// Anything else (truncated at-bat, unknown event)
    Other,
}

impl AtBatOutcome {
    /// Classify a plate-appearance result event
    ///
    /// # Example
    /// ```
    /// use pitchseq::pitch::AtBatOutcome;
    ///
    /// assert_eq!(AtBatOutcome::classify("strikeout"), AtBatOutcome::Out);
    /// assert_eq!(AtBatOutcome::classify("home_run"), AtBatOutcome::Reach);
    /// assert_eq!(AtBatOutcome::classify("caught_stealing_2b"), AtBatOutcome::Other);
    /// ```
    pub fn classify(event: &str) -> Self {
        match event {
            "strikeout"
            | "out"
            | "field_out"
            | "force_out"
            | "double_play"
            | "triple_play"
            | "strikeout_double_play"
            | "sac_fly"
            | "sac_bunt" => AtBatOutcome::Out,
            "single" | "double" | "triple" | "home_run" | "walk" | "hit_by_pitch"
            | "catcher_interf" | "field_error" | "fielders_choice" => AtBatOutcome::Reach,
            _ => AtBatOutcome::Other,
        }
    }
}

/// Coarse grouping of a pitch call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchResult {
    InPlay,
    Ball,
    Strike,
    Foul,
    HitByPitch,
    /// Unrecognized or missing description
    Result,
}

impl PitchResult {
    pub fn from_description(description: Option<&str>) -> Self {
        match description {
            Some("hit_into_play") => PitchResult::InPlay,
            Some("ball" | "blocked_ball") => PitchResult::Ball,
            Some(
                "called_strike"
                | "swinging_strike"
                | "swinging_strike_blocked"
                | "foul_tip"
                | "foul_bunt"
                | "missed_bunt",
            ) => PitchResult::Strike,
            Some("foul") => PitchResult::Foul,
            Some("hit_by_pitch") => PitchResult::HitByPitch,
            _ => PitchResult::Result,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PitchResult::InPlay => "in_play",
            PitchResult::Ball => "ball",
            PitchResult::Strike => "strike",
            PitchResult::Foul => "foul",
            PitchResult::HitByPitch => "hit_by_pitch",
            PitchResult::Result => "result",
        }
    }
}

/// Activity label for one pitch: `"{pitch_type} - {result}"`
pub fn activity_label(pitch_type: &str, result: PitchResult) -> String {
    format!("{} - {}", pitch_type, result.label())
}

/// Options for turning pitch records into event logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Label prepended to every case (`None` = no start sentinel)
    pub start_label: Option<String>,

    /// Label appended to every case (`None` = no end sentinel)
    pub end_label: Option<String>,

    /// Pitch types removed before labelling
    pub exclude_pitch_types: Vec<String>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            start_label: Some("start".to_string()),
            end_label: Some("end".to_string()),
            exclude_pitch_types: Vec::new(),
        }
    }
}

/// The two comparison populations plus bookkeeping for the rest
#[derive(Debug, Clone, Default)]
pub struct OutcomeLogs {
    pub out: EventLog,
    pub reach: EventLog,

    /// At-bats whose outcome classified as `Other`
    pub other: usize,

    /// At-bats dropped for a missing pitch type or having no pitches left
    /// after exclusion
    pub dropped: usize,

    /// Ids of at-bats that passed the missing-pitch-type filter, whatever
    /// their outcome
    pub retained: BTreeSet<String>,
}

impl OutcomeLogs {
    /// Records belonging to retained at-bats, in input order
    pub fn retained_records(&self, records: &[PitchRecord]) -> Vec<PitchRecord> {
        records
            .iter()
            .filter(|r| self.retained.contains(&r.at_bat_id))
            .cloned()
            .collect()
    }
}

/// Parse a JSON array of pitch records
pub fn parse_pitch_log(json: &str) -> Result<Vec<PitchRecord>, LogError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON pitch log from disk
pub fn load_pitch_log<P: AsRef<Path>>(path: P) -> Result<Vec<PitchRecord>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read pitch log: {}", path.as_ref().display()))?;

    parse_pitch_log(&content)
        .with_context(|| format!("Invalid pitch log: {}", path.as_ref().display()))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Split pitch records into out and reach event logs
///
/// Per at-bat, pitches are ordered by `pitch_number`. An at-bat with any
/// pitch lacking a pitch type is dropped whole. The outcome is taken from
/// the last pitch carrying a non-empty `events` value, before any pitch-type
/// exclusion.
///
/// # Errors
/// `LogError::EmptyCaseId` for a record without an at-bat id and
/// `LogError::DuplicateOrder` when two pitches of one at-bat share a number.
pub fn build_outcome_logs(
    records: &[PitchRecord],
    options: &LogOptions,
) -> Result<OutcomeLogs, LogError> {
    let mut at_bats: BTreeMap<&str, Vec<&PitchRecord>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.at_bat_id.is_empty() {
            return Err(LogError::EmptyCaseId { index });
        }
        at_bats
            .entry(record.at_bat_id.as_str())
            .or_default()
            .push(record);
    }

    let mut out_cases = Vec::new();
    let mut reach_cases = Vec::new();
    let mut logs = OutcomeLogs::default();

    for (at_bat_id, mut pitches) in at_bats {
        pitches.sort_by_key(|p| p.pitch_number);

        if let Some(pair) = pitches
            .windows(2)
            .find(|w| w[0].pitch_number == w[1].pitch_number)
        {
            return Err(LogError::DuplicateOrder {
                case_id: at_bat_id.to_string(),
                order: pair[0].pitch_number,
            });
        }

        if pitches.iter().any(|p| is_blank(&p.pitch_type)) {
            tracing::debug!(at_bat_id, "dropping at-bat with missing pitch type");
            logs.dropped += 1;
            continue;
        }
        logs.retained.insert(at_bat_id.to_string());

        let outcome = pitches
            .iter()
            .rev()
            .find_map(|p| p.events.as_deref().filter(|e| !e.is_empty()))
            .map_or(AtBatOutcome::Other, AtBatOutcome::classify);

        let labels: Vec<String> = pitches
            .iter()
            .filter_map(|p| {
                let pitch_type = p.pitch_type.as_deref()?;
                if options.exclude_pitch_types.iter().any(|x| x == pitch_type) {
                    return None;
                }
                let result = PitchResult::from_description(p.description.as_deref());
                Some(activity_label(pitch_type, result))
            })
            .collect();

        if labels.is_empty() {
            logs.dropped += 1;
            continue;
        }

        let mut activities = Vec::with_capacity(labels.len() + 2);
        activities.extend(options.start_label.iter().cloned());
        activities.extend(labels);
        activities.extend(options.end_label.iter().cloned());

        let case = Case::new(at_bat_id, activities);
        match outcome {
            AtBatOutcome::Out => out_cases.push(case),
            AtBatOutcome::Reach => reach_cases.push(case),
            AtBatOutcome::Other => logs.other += 1,
        }
    }

    logs.out = EventLog::from_cases(out_cases);
    logs.reach = EventLog::from_cases(reach_cases);

    tracing::info!(
        out = logs.out.len(),
        reach = logs.reach.len(),
        other = logs.other,
        dropped = logs.dropped,
        "built outcome logs"
    );

    Ok(logs)
}
