//! Side-by-side comparison of the trained models

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use serde::Serialize;

use crate::model::{results_path, ModelKind, TrainingResult};
use crate::pipeline::PipelineError;

/// Test-set metrics and training time of one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub model: ModelKind,
    pub name: String,
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
    pub training_time: f64,
    pub cv_r2_mean: f64,
}

impl ComparisonRow {
    pub fn from_result(result: &TrainingResult) -> Self {
        Self {
            model: result.model,
            name: result.model.display_name().to_string(),
            r2: result.test.r2,
            rmse: result.test.rmse,
            mae: result.test.mae,
            training_time: result.training_time,
            cv_r2_mean: result.cv_r2_mean,
        }
    }
}

/// Load the result record of every model kind from `dir`.
///
/// All three must be present; a missing record is `DataUnavailable`.
pub fn load_results(dir: &Path) -> Result<Vec<TrainingResult>> {
    ModelKind::ALL
        .iter()
        .map(|&kind| {
            let path = results_path(dir, kind);
            if !path.exists() {
                return Err(PipelineError::data_unavailable(&path, "result record not found").into());
            }
            let result = TrainingResult::load(&path)?;
            if result.model != kind {
                return Err(PipelineError::SchemaMismatch(format!(
                    "{} holds results for {}, expected {}",
                    path.display(),
                    result.model,
                    kind
                ))
                .into());
            }
            Ok(result)
        })
        .collect()
}

/// Rows sorted by test R² descending
pub fn rank_models(results: &[TrainingResult]) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = results.iter().map(ComparisonRow::from_result).collect();
    rows.sort_by(|a, b| b.r2.partial_cmp(&a.r2).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

pub fn comparison_table(rows: &[ComparisonRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Model").add_attribute(Attribute::Bold),
        Cell::new("R²").add_attribute(Attribute::Bold),
        Cell::new("RMSE").add_attribute(Attribute::Bold),
        Cell::new("MAE").add_attribute(Attribute::Bold),
        Cell::new("Training Time (s)").add_attribute(Attribute::Bold),
        Cell::new("CV R²").add_attribute(Attribute::Bold),
    ]);

    for (i, row) in rows.iter().enumerate() {
        let name = Cell::new(&row.name);
        let name = if i == 0 {
            name.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            name
        };

        table.add_row(vec![
            Cell::new(i + 1),
            name,
            Cell::new(format!("{:.4}", row.r2)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", row.rmse)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", row.mae)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", row.training_time)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", row.cv_r2_mean)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

pub fn display_comparison(rows: &[ComparisonRow]) {
    println!();
    println!(
        "    {} {}",
        style("🏆").cyan(),
        style("MODEL PERFORMANCE COMPARISON (TEST SET)").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    // Indent the table
    for line in comparison_table(rows).to_string().lines() {
        println!("    {}", line);
    }
}

/// Export the ranked rows as JSON
pub fn export_comparison(rows: &[ComparisonRow], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .context("Failed to serialize model comparison to JSON")?;

    std::fs::write(output_path, json).map_err(|e| PipelineError::io_failure(output_path, e))?;

    Ok(())
}
