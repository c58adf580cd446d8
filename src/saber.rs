//! Sabermetric summaries over pitch records
//!
//! Pitches per plate appearance, strikeouts per plate appearance and
//! Fielding Independent Pitching. Plate appearances are distinct at-bat ids.

use crate::pitch::PitchRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default FIP constant (league-season dependent; ~3.1 in recent seasons)
pub const DEFAULT_FIP_CONSTANT: f64 = 3.1;

/// Events that record an out for innings-pitched purposes
const OUT_EVENTS: &[&str] = &[
    "strikeout",
    "field_out",
    "force_out",
    "grounded_into_double_play",
    "double_play",
    "sac_fly",
    "sac_bunt",
];

/// Counting stats behind FIP
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FipComponents {
    pub plate_appearances: usize,
    pub strikeouts: usize,
    pub walks: usize,
    pub hit_by_pitch: usize,
    pub home_runs: usize,
    pub outs: usize,
}

impl FipComponents {
    /// Tally result events over all records
    pub fn from_records(records: &[PitchRecord]) -> Self {
        let mut c = FipComponents {
            plate_appearances: plate_appearances(records),
            ..Default::default()
        };

        for event in records.iter().filter_map(|r| r.events.as_deref()) {
            match event {
                "strikeout" => c.strikeouts += 1,
                "walk" => c.walks += 1,
                "hit_by_pitch" => c.hit_by_pitch += 1,
                "home_run" => c.home_runs += 1,
                _ => {}
            }
            if OUT_EVENTS.contains(&event) {
                c.outs += 1;
            }
        }

        c
    }

    /// Innings pitched: outs / 3
    pub fn innings_pitched(&self) -> f64 {
        self.outs as f64 / 3.0
    }

    /// `(13·HR + 3·(BB + HBP) − 2·K) / IP + constant`, `None` when IP is 0
    pub fn fip(&self, constant: f64) -> Option<f64> {
        let ip = self.innings_pitched();
        if ip <= 0.0 {
            return None;
        }

        let numerator = 13.0 * self.home_runs as f64
            + 3.0 * (self.walks + self.hit_by_pitch) as f64
            - 2.0 * self.strikeouts as f64;

        Some(numerator / ip + constant)
    }
}

/// Fielding Independent Pitching over `records`
pub fn fip(records: &[PitchRecord], constant: f64) -> Option<f64> {
    FipComponents::from_records(records).fip(constant)
}

fn plate_appearances(records: &[PitchRecord]) -> usize {
    records
        .iter()
        .map(|r| r.at_bat_id.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Pitches thrown per plate appearance
pub fn pitches_per_plate_appearance(records: &[PitchRecord]) -> Option<f64> {
    let pa = plate_appearances(records);
    (pa > 0).then(|| records.len() as f64 / pa as f64)
}

/// Share of plate appearances ending in a strikeout
///
/// The at-bat's result is its last non-empty `events` value by pitch number.
pub fn strikeouts_per_plate_appearance(records: &[PitchRecord]) -> Option<f64> {
    let mut last_event: BTreeMap<&str, (i64, Option<&str>)> = BTreeMap::new();

    for record in records {
        let entry = last_event
            .entry(record.at_bat_id.as_str())
            .or_insert((i64::MIN, None));
        if let Some(event) = record.events.as_deref().filter(|e| !e.is_empty()) {
            if record.pitch_number >= entry.0 {
                *entry = (record.pitch_number, Some(event));
            }
        }
    }

    if last_event.is_empty() {
        return None;
    }

    let strikeouts = last_event
        .values()
        .filter(|(_, event)| *event == Some("strikeout"))
        .count();

    Some(strikeouts as f64 / last_event.len() as f64)
}

/// All rate stats for one population of pitches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaberSummary {
    pub pitches: usize,
    pub components: FipComponents,
    pub pitches_per_pa: Option<f64>,
    pub strikeouts_per_pa: Option<f64>,
    pub fip: Option<f64>,
}

impl SaberSummary {
    pub fn from_records(records: &[PitchRecord], fip_constant: f64) -> Self {
        let components = FipComponents::from_records(records);
        Self {
            pitches: records.len(),
            components,
            pitches_per_pa: pitches_per_plate_appearance(records),
            strikeouts_per_pa: strikeouts_per_plate_appearance(records),
            fip: components.fip(fip_constant),
        }
    }

    pub fn to_report_string(&self) -> String {
        let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v));

        let mut report = String::from("\n⚾ Sabermetrics:\n");
        report.push_str(&format!(
            "  - Pitches: {} over {} PA\n",
            self.pitches, self.components.plate_appearances
        ));
        report.push_str(&format!("  - P/PA: {}\n", fmt(self.pitches_per_pa)));
        report.push_str(&format!("  - K/PA: {}\n", fmt(self.strikeouts_per_pa)));
        report.push_str(&format!("  - FIP: {}\n", fmt(self.fip)));
        report
    }
}
