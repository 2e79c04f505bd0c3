//! `train` stage: fit the selected models on the persisted splits

use std::time::Instant;

use anyhow::Result;
use console::style;

use super::config::PipelineConfig;
use crate::model::{save_trained, train_models, ModelKind, RegressionMetrics, TrainingResult};
use crate::pipeline::load_splits;
use crate::utils::{
    create_spinner, finish_with_success, print_info, print_ranked, print_step_header,
    print_step_time, print_success,
};

fn print_metrics(label: &str, metrics: &RegressionMetrics) {
    println!(
        "      {:<11} R² {}  RMSE {}  MAE {}",
        label,
        style(format!("{:.4}", metrics.r2)).cyan(),
        style(format!("{:.4}", metrics.rmse)).cyan(),
        style(format!("{:.4}", metrics.mae)).cyan()
    );
}

/// Train `kinds` concurrently and persist a model and result record for each
pub fn run_train(config: &PipelineConfig, kinds: &[ModelKind]) -> Result<Vec<TrainingResult>> {
    print_step_header(7, "Training Models");
    let step_start = Instant::now();

    let spinner = create_spinner("Loading split tables...");
    let splits = load_splits(&config.processed_dir)?;
    finish_with_success(
        &spinner,
        &format!(
            "{} train, {} validation, {} test rows",
            splits.train.height(),
            splits.validation.height(),
            splits.test.height()
        ),
    );

    let trainer = config.trainer_config();
    let names: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
    let spinner = create_spinner(&format!(
        "Training {} model(s): {}...",
        kinds.len(),
        names.join(", ")
    ));
    let trained = train_models(kinds, &splits, &trainer)?;
    finish_with_success(&spinner, &format!("{} model(s) trained", trained.len()));

    let mut results = Vec::with_capacity(trained.len());
    for model in &trained {
        let result = &model.result;

        println!();
        println!("    {}", style(result.model.display_name()).white().bold());
        print_info(&format!("Fitted in {:.2}s", result.training_time));
        print_metrics("Validation", &result.validation);
        print_metrics("Test", &result.test);
        println!(
            "      {:<11} mean R² {}",
            format!("CV ({})", trainer.cv_folds),
            style(format!("{:.4}", result.cv_r2_mean)).cyan()
        );

        let title = if result.model == ModelKind::LinearRegression {
            "Top coefficients (absolute):"
        } else {
            "Top feature importances:"
        };
        let top: Vec<(String, f64)> = model.ranking.iter().take(5).cloned().collect();
        if !top.is_empty() {
            print_ranked(title, &top);
        }

        let (model_file, results_file) = save_trained(model, &config.model_dir)?;
        print_success(&format!(
            "Saved {} and {}",
            model_file.display(),
            results_file.display()
        ));

        results.push(result.clone());
    }

    print_step_time(step_start.elapsed());
    Ok(results)
}
