#![no_main]

use libfuzzer_sys::fuzz_target;
use pitchseq::pitch::{build_outcome_logs, parse_pitch_log, LogOptions};
use pitchseq::transition::estimate_transitions;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and log construction must never panic; errors are fine
        if let Ok(records) = parse_pitch_log(input) {
            if let Ok(logs) = build_outcome_logs(&records, &LogOptions::default()) {
                let _ = estimate_transitions(&logs.out);
                let _ = estimate_transitions(&logs.reach);
            }
        }
    }
});
