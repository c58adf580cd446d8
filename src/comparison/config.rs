// Configuration for transition distribution comparison

use crate::comparison::chi_square::DEFAULT_CRITICAL_VALUE;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for comparing two transition tables
///
/// # Example
/// ```
/// use pitchseq::comparison::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.critical_value, 3.84);
/// assert_eq!(config.report_top_k, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Chi-square value above which a node is flagged significant
    ///
    /// Applied regardless of the node's degrees of freedom. The default 3.84
    /// is the df = 1, alpha = 0.05 point; changing it changes emitted flags.
    pub critical_value: f64,

    /// Rows shown per section of the text report
    pub report_top_k: usize,

    /// Transitions below this probability are left out of table output
    ///
    /// Only affects presentation (CSV rows); every metric still uses the
    /// full tables.
    pub min_report_probability: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            critical_value: DEFAULT_CRITICAL_VALUE,
            report_top_k: 10,
            min_report_probability: 0.0,
        }
    }
}

impl ComparisonConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    ///
    /// # Example TOML
    /// ```toml
    /// critical_value = 5.99
    /// report_top_k = 5
    /// min_report_probability = 0.01
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.critical_value.is_finite() || self.critical_value < 0.0 {
            return Err(ConfigError::InvalidCriticalValue(self.critical_value));
        }

        if self.report_top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }

        if !(0.0..=1.0).contains(&self.min_report_probability) {
            return Err(ConfigError::InvalidMinProbability(
                self.min_report_probability,
            ));
        }

        Ok(())
    }
}
