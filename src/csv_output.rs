//! CSV output format for transition tables
//!
//! One row per observed transition and population, for spreadsheet analysis
//! or a downstream graph renderer.

use crate::transition::TransitionModel;

/// CSV record for a single transition
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTransition {
    pub population: String,
    pub from: String,
    pub to: String,
    pub count: u64,
    pub probability: f64,
}

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<CsvTransition>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every transition of `model` whose probability is at least
    /// `min_probability`
    pub fn add_model(&mut self, population: &str, model: &TransitionModel, min_probability: f64) {
        for (from, to, count) in model.counts.pairs() {
            // Rows with zero total have no probability entry
            let Some(probability) = model.probabilities.get(from, to) else {
                continue;
            };
            if probability < min_probability {
                continue;
            }

            self.rows.push(CsvTransition {
                population: population.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                count,
                probability,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn header() -> &'static str {
        "population,from,to,count,probability"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        // If field contains comma, quote, or newline, wrap in quotes and escape quotes
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(row: &CsvTransition) -> String {
        [
            Self::escape_field(&row.population),
            Self::escape_field(&row.from),
            Self::escape_field(&row.to),
            row.count.to_string(),
            format!("{:.6}", row.probability),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(Self::header());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}
