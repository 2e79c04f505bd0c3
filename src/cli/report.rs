//! `report` stage: rank the trained models and render charts

use std::time::Instant;

use anyhow::Result;

use super::config::PipelineConfig;
use crate::report::{
    display_comparison, export_comparison, load_results, rank_models, render_comparison_charts,
    ComparisonRow,
};
use crate::utils::{print_info, print_step_header, print_step_time, print_success};

pub fn run_report(config: &PipelineConfig) -> Result<Vec<ComparisonRow>> {
    print_step_header(8, "Comparing Models");
    let step_start = Instant::now();

    let results = load_results(&config.model_dir)?;
    let rows = rank_models(&results);
    display_comparison(&rows);

    println!();
    if let Some(best) = rows.first() {
        print_success(&format!(
            "Best model on the test set: {} (R² = {:.4})",
            best.name, best.r2
        ));
    }

    for path in render_comparison_charts(&rows, &config.output_dir)? {
        print_info(&format!("Chart written to {}", path.display()));
    }

    let comparison_path = config.comparison_path();
    export_comparison(&rows, &comparison_path)?;
    print_info(&format!("Comparison written to {}", comparison_path.display()));

    print_step_time(step_start.elapsed());
    Ok(rows)
}
