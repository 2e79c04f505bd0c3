//! `preprocess` stage: load, encode, filter, select, split and persist

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use super::config::PipelineConfig;
use crate::pipeline::{
    analyze_missing_values, columns_with_missing, dataset_stats, extract_target, load_dataset,
    raw_features, remove_target_outliers, save_splits, select_features, split_dataset, DataSplits,
    LabeledFrame, OutlierReport, Preprocessor, MIN_TARGET_CORRELATION,
};
use crate::report::PreprocessSummary;
use crate::utils::{
    create_spinner, finish_with_success, print_count, print_info, print_ranked, print_step_header,
    print_step_time, print_success, print_warning,
};

/// Everything the preprocessing stage produced
#[derive(Debug)]
pub struct PreprocessOutcome {
    pub preprocessor: Preprocessor,
    pub outliers: OutlierReport,
    pub splits: DataSplits,
    pub summary: PreprocessSummary,
}

pub fn run_preprocess(config: &PipelineConfig) -> Result<PreprocessOutcome> {
    // Step 1: Load dataset
    print_step_header(1, "Loading Dataset");
    let step_start = Instant::now();

    let spinner = create_spinner(&format!("Reading {}...", config.input.display()));
    let raw = load_dataset(&config.input, config.infer_schema_length)?;
    let stats = dataset_stats(&raw);
    finish_with_success(
        &spinner,
        &format!(
            "Loaded {} rows × {} columns ({:.2} MB)",
            stats.rows, stats.columns, stats.memory_mb
        ),
    );
    print_step_time(step_start.elapsed());

    let mut summary = PreprocessSummary::new(raw.height());

    // Step 2: Impute, scale and encode
    print_step_header(2, "Imputing, Scaling and Encoding");
    let step_start = Instant::now();

    let features = raw_features(&raw);
    let missing = analyze_missing_values(&features)?;
    let incomplete = columns_with_missing(&missing);
    print_count("columns with missing values", incomplete.len(), None);
    for stat in &incomplete {
        print_info(&format!(
            "{}: {} missing ({:.2}%), filled with the median",
            stat.column,
            stat.missing,
            stat.ratio * 100.0
        ));
    }

    let (preprocessor, encoded) = Preprocessor::fit_transform(&features)?;
    for column in &preprocessor.dropped_empty {
        print_warning(&format!("{} has no observed values and was dropped", column));
    }
    summary.set_encoded_features(preprocessor.feature_names().len());
    print_success(&format!(
        "{} numeric features scaled, {} categories encoded",
        preprocessor.numeric.len(),
        preprocessor.categories.len()
    ));

    let target = extract_target(&raw)?;
    let frame = LabeledFrame::new(encoded, target).context("Encoded features lost row alignment")?;
    print_step_time(step_start.elapsed());

    // Step 3: Remove target outliers
    print_step_header(3, "Removing Target Outliers");
    let step_start = Instant::now();

    let (frame, outliers) = remove_target_outliers(&frame)?;
    let bounds = outliers.bounds;
    print_info(&format!(
        "Q1 = {:.2}, Q3 = {:.2}, IQR = {:.2}, upper bound = {:.2}",
        bounds.q1, bounds.q3, bounds.iqr, bounds.upper_bound
    ));
    print_count(
        "outlier rows",
        outliers.removed(),
        Some(format!("({:.2}% of rows)", outliers.removed_ratio() * 100.0).as_str()),
    );
    summary.set_outliers_removed(outliers.removed());
    print_step_time(step_start.elapsed());

    // Step 4: Correlation-based feature selection
    print_step_header(4, "Selecting Features by Target Correlation");
    let step_start = Instant::now();

    let (frame, selection) = select_features(&frame)?;
    let top: Vec<(String, f64)> = selection
        .correlations
        .iter()
        .take(5)
        .map(|c| (c.feature.clone(), c.correlation))
        .collect();
    print_ranked("Top correlations with the target:", &top);
    print_count(
        "weakly correlated features",
        selection.dropped.len(),
        Some(format!("(|r| < {})", MIN_TARGET_CORRELATION).as_str()),
    );
    summary.add_correlation_drops(selection.dropped.clone());
    print_step_time(step_start.elapsed());

    // Step 5: Split
    print_step_header(5, "Splitting Train / Validation / Test");
    let step_start = Instant::now();

    let splits = split_dataset(&frame, config.seed)?;
    summary.set_split_sizes(
        splits.train.height(),
        splits.validation.height(),
        splits.test.height(),
    );
    print_success(&format!(
        "{} train, {} validation, {} test rows (seed {})",
        splits.train.height(),
        splits.validation.height(),
        splits.test.height(),
        config.seed
    ));
    print_step_time(step_start.elapsed());

    // Step 6: Persist
    print_step_header(6, "Saving Processed Data");
    let step_start = Instant::now();

    let spinner = create_spinner("Writing split tables...");
    let written = save_splits(&splits, &config.processed_dir)?;
    preprocessor.save(&config.preprocessor_path())?;
    finish_with_success(
        &spinner,
        &format!(
            "{} tables written to {}",
            written.len(),
            style(config.processed_dir.display()).dim()
        ),
    );
    print_step_time(step_start.elapsed());

    summary.display();

    Ok(PreprocessOutcome {
        preprocessor,
        outliers,
        splits,
        summary,
    })
}
