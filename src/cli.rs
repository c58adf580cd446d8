//! CLI argument parsing for pitchseq

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV transition table for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "pitchseq")]
#[command(version)]
#[command(
    about = "Pitch-sequence transition models for outs vs. reaches, and how they differ",
    long_about = None
)]
pub struct Cli {
    /// JSON pitch log (array of pitch records)
    #[arg(value_name = "PITCH_LOG")]
    pub input: PathBuf,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Comparison config file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rows per ranked report section (overrides config)
    #[arg(long = "top-k", value_name = "K")]
    pub top_k: Option<usize>,

    /// Chi-square significance threshold (overrides config)
    #[arg(long = "critical-value", value_name = "CHI2")]
    pub critical_value: Option<f64>,

    /// Minimum probability for CSV rows (overrides config)
    #[arg(long = "min-probability", value_name = "P")]
    pub min_probability: Option<f64>,

    /// Label inserted before the first pitch of every at-bat
    #[arg(long = "start-label", default_value = "start")]
    pub start_label: String,

    /// Label appended after the last pitch of every at-bat
    #[arg(long = "end-label", default_value = "end")]
    pub end_label: String,

    /// Do not bracket at-bats with start/end labels
    #[arg(long = "no-sentinels")]
    pub no_sentinels: bool,

    /// Drop pitches of these types before labelling (e.g. --exclude-pitch PO,EP)
    #[arg(long = "exclude-pitch", value_name = "TYPE", value_delimiter = ',')]
    pub exclude_pitch: Vec<String>,

    /// Include sabermetric summary (P/PA, K/PA, FIP)
    #[arg(long = "saber")]
    pub saber: bool,

    /// FIP constant used with --saber
    #[arg(long = "fip-constant", value_name = "C", default_value = "3.1")]
    pub fip_constant: f64,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
