// Human-readable summary of a comparison

use crate::comparison::compare::ComparisonResult;
use crate::comparison::config::ComparisonConfig;
use serde::{Deserialize, Serialize};

/// Number of cases behind each side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTotals {
    pub out: usize,
    pub reach: usize,
}

const RULE: &str = "============================================================";

impl ComparisonResult {
    /// Generate the human-readable comparison report
    ///
    /// Every ranked section is cut to `config.report_top_k` rows.
    pub fn to_report_string(&self, config: &ComparisonConfig, totals: Option<CaseTotals>) -> String {
        let k = config.report_top_k;
        let mut report = String::new();

        report.push_str(RULE);
        report.push('\n');
        report.push_str("TRANSITION PROBABILITY COMPARISON (out vs reach)\n");
        report.push_str(RULE);
        report.push('\n');

        if let Some(totals) = totals {
            report.push_str("\n📋 Cases:\n");
            report.push_str(&format!("  - Out cases: {}\n", totals.out));
            report.push_str(&format!("  - Reach cases: {}\n", totals.reach));
            report.push_str(&format!("  - Total cases: {}\n", totals.out + totals.reach));
        }

        report.push_str("\n📊 Overall:\n");
        report.push_str(&format!("  - Total nodes: {}\n", self.total_nodes));
        report.push_str(&format!(
            "  - Nodes with transitions: {}\n",
            self.nodes_with_transitions
        ));
        report.push_str(&format!("  - Overall MSE: {:.6}\n", self.overall_mse));
        report.push_str(&format!(
            "  - Average KL divergence: {:.6}\n",
            self.avg_kl_divergence
        ));
        report.push_str(&format!(
            "  - Average JS divergence: {:.6}\n",
            self.avg_js_divergence
        ));
        report.push_str(&format!(
            "  - Average total variation distance: {:.6}\n",
            self.avg_tv_distance
        ));

        self.push_chi_square_section(&mut report, config);

        report.push_str(&format!("\n📈 Node MSE (top {}):\n", k));
        for (node, mse) in ranked(&self.mse_by_node, k) {
            report.push_str(&format!("  - {}: {:.6}\n", node, mse));
        }

        report.push_str(&format!("\n📈 Node MAE (top {}):\n", k));
        for (node, mae) in ranked(&self.mae_by_node, k) {
            report.push_str(&format!("  - {}: {:.6}\n", node, mae));
        }

        report.push_str(&format!("\n🔀 Largest transition differences (top {}):\n", k));
        for (i, d) in self.largest_differences(k).iter().enumerate() {
            report.push_str(&format!(
                "  {}. {} -> {}: out={:.4}, reach={:.4}, diff={:+.4}\n",
                i + 1,
                d.from,
                d.to,
                d.diff.out,
                d.diff.reach,
                d.diff.diff
            ));
        }

        report
    }

    fn push_chi_square_section(&self, report: &mut String, config: &ComparisonConfig) {
        if self.chi_square.is_empty() {
            return;
        }

        let k = config.report_top_k;
        let tested = self.chi_square.len();
        let significant = self.significant_nodes();

        report.push_str(&format!(
            "\n🧪 Chi-square (critical value {:.2}, applied at every df):\n",
            config.critical_value
        ));
        report.push_str(&format!("  - Nodes tested: {}\n", tested));
        report.push_str(&format!(
            "  - Significant nodes: {} ({:.1}%)\n",
            significant.len(),
            significant.len() as f64 / tested as f64 * 100.0
        ));

        if !significant.is_empty() {
            report.push_str(&format!("\n  Significant (top {}):\n", k));
            for (i, (node, test)) in significant.iter().take(k).enumerate() {
                report.push_str(&format!(
                    "    {}. {}: chi-square={:.4}, df={}\n",
                    i + 1,
                    node,
                    test.chi_square,
                    test.df
                ));
            }
        }

        // Header stays even when every tested node is significant
        let mut not_significant: Vec<_> = self
            .chi_square
            .iter()
            .filter(|(_, test)| !test.significant)
            .collect();
        not_significant.sort_by(|a, b| a.1.chi_square.total_cmp(&b.1.chi_square));
        report.push_str(&format!("\n  Not significant (lowest {}):\n", k));
        for (i, (node, test)) in not_significant.iter().take(k).enumerate() {
            report.push_str(&format!(
                "    {}. {}: chi-square={:.4}, df={}\n",
                i + 1,
                node,
                test.chi_square,
                test.df
            ));
        }

        let mut by_statistic: Vec<_> = self.chi_square.iter().collect();
        by_statistic.sort_by(|a, b| b.1.chi_square.total_cmp(&a.1.chi_square));
        report.push_str(&format!("\n  By statistic (top {}):\n", k));
        for (i, (node, test)) in by_statistic.iter().take(k).enumerate() {
            let mark = if test.significant { "*" } else { "" };
            report.push_str(&format!(
                "    {}. {}: chi-square={:.4}, df={}{}\n",
                i + 1,
                node,
                test.chi_square,
                test.df,
                mark
            ));
        }
    }
}

/// Entries sorted by value descending, cut to `k`
fn ranked(values: &std::collections::BTreeMap<String, f64>, k: usize) -> Vec<(&str, f64)> {
    let mut entries: Vec<_> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.truncate(k);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare_transitions;
    use crate::transition::{TransitionCounts, TransitionProbabilities};

    fn sample() -> (ComparisonResult, ComparisonConfig) {
        let out_counts: TransitionCounts = vec![("A", "B", 10), ("A", "C", 2)]
            .into_iter()
            .collect();
        let reach_counts: TransitionCounts = vec![("A", "B", 1), ("A", "C", 9)]
            .into_iter()
            .collect();
        let out = TransitionProbabilities::from_counts(&out_counts);
        let reach = TransitionProbabilities::from_counts(&reach_counts);
        let config = ComparisonConfig::default();

        let result = compare_transitions(&out, &reach, Some((&out_counts, &reach_counts)), &config);
        (result, config)
    }

    #[test]
    fn test_report_contains_sections() {
        let (result, config) = sample();
        let report = result.to_report_string(&config, Some(CaseTotals { out: 12, reach: 10 }));

        assert!(report.contains("Out cases: 12"));
        assert!(report.contains("Total cases: 22"));
        assert!(report.contains("Overall MSE"));
        assert!(report.contains("Chi-square"));
        assert!(report.contains("A -> B"));
    }

    #[test]
    fn test_report_omits_chi_square_without_counts() {
        let (mut result, config) = sample();
        result.chi_square.clear();

        let report = result.to_report_string(&config, None);
        assert!(!report.contains("Chi-square"));
        assert!(!report.contains("Out cases"));
    }

    #[test]
    fn test_report_keeps_not_significant_header_when_empty() {
        let (result, config) = sample();
        assert!(result.chi_square.values().all(|t| t.significant));

        let report = result.to_report_string(&config, None);
        assert!(report.contains("Not significant (lowest 10):\n\n  By statistic"));
    }

    #[test]
    fn test_report_respects_top_k() {
        let (result, _) = sample();
        let config = ComparisonConfig {
            report_top_k: 1,
            ..Default::default()
        };

        let report = result.to_report_string(&config, None);
        assert!(report.contains("  1. A -> "));
        assert!(!report.contains("  2. A -> "));
    }
}
