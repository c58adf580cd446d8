//! Pitchseq - first-order transition models over pitch sequences
//!
//! This library estimates Markov transition tables from case-based event
//! logs and compares the tables built for two populations of at-bats
//! (outs vs. reaches) with per-pair differences, MSE/MAE, KL/JS divergence,
//! total variation distance and a per-node chi-square test.

pub mod cli;
pub mod comparison;
pub mod csv_output;
pub mod error;
pub mod event_log;
pub mod json_output;
pub mod pitch;
pub mod saber;
pub mod transition;
