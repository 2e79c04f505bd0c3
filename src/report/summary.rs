//! Preprocessing summary report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Row and feature counts collected while preparing the splits
#[derive(Debug, Default)]
pub struct PreprocessSummary {
    pub initial_rows: usize,
    pub encoded_features: usize,
    pub outliers_removed: usize,
    pub dropped_low_correlation: Vec<String>,
    pub final_features: usize,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub test_rows: usize,
}

impl PreprocessSummary {
    pub fn new(initial_rows: usize) -> Self {
        Self {
            initial_rows,
            ..Default::default()
        }
    }

    pub fn set_encoded_features(&mut self, count: usize) {
        self.encoded_features = count;
        self.final_features = count;
    }

    pub fn set_outliers_removed(&mut self, count: usize) {
        self.outliers_removed = count;
    }

    pub fn add_correlation_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_low_correlation = features;
    }

    pub fn set_split_sizes(&mut self, train: usize, validation: usize, test: usize) {
        self.train_rows = train;
        self.validation_rows = validation;
        self.test_rows = test;
    }

    pub fn clean_rows(&self) -> usize {
        self.initial_rows - self.outliers_removed
    }

    /// Share of the clean rows held by a partition, as a percentage
    pub fn share(&self, rows: usize) -> f64 {
        let clean = self.clean_rows();
        if clean == 0 {
            0.0
        } else {
            rows as f64 / clean as f64 * 100.0
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PREPROCESSING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Initial Rows"), Cell::new(self.initial_rows)]);

        table.add_row(vec![
            Cell::new("🗑️  Outliers Removed"),
            Cell::new(self.outliers_removed).fg(if self.outliers_removed == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("🧮 Encoded Features"),
            Cell::new(self.encoded_features),
        ]);

        table.add_row(vec![
            Cell::new("🔗 Dropped (Low Correlation)"),
            Cell::new(self.dropped_low_correlation.len()).fg(
                if self.dropped_low_correlation.is_empty() {
                    Color::White
                } else {
                    Color::Red
                },
            ),
        ]);

        table.add_row(vec![
            Cell::new("✅ Final Features"),
            Cell::new(self.final_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        for (label, rows) in [
            ("🏋️ Train", self.train_rows),
            ("🔍 Validation", self.validation_rows),
            ("🧪 Test", self.test_rows),
        ] {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(format!("{} ({:.2}%)", rows, self.share(rows))).fg(Color::Cyan),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.dropped_low_correlation.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Low Correlation").yellow(),
                style(format!("({})", self.dropped_low_correlation.len())).dim()
            );
            for feature in &self.dropped_low_correlation {
                println!("        {} {}", style("•").dim(), feature);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_flow_through() {
        let mut summary = PreprocessSummary::new(1000);
        summary.set_encoded_features(13);
        summary.set_outliers_removed(50);
        summary.add_correlation_drops(vec!["scaled_Population".to_string()]);
        summary.set_split_sizes(665, 143, 142);

        assert_eq!(summary.final_features, 12);
        assert_eq!(summary.clean_rows(), 950);
        assert!((summary.share(665) - 70.0).abs() < 1e-9);
    }
}
