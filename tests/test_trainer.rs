//! Tests for the shared trainer and its persisted records

use pricefit::model::{
    cross_val_r2, load_model, model_path, results_path, save_trained, train_model, train_models,
    Design, ModelKind, Regressor, TrainerConfig, TrainingResult,
};
use pricefit::pipeline::PipelineError;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

fn quick_config() -> TrainerConfig {
    let mut config = TrainerConfig::default().with_seed(42);
    config.cv_folds = 3;
    config.forest.n_estimators = 15;
    config.boosting.n_estimators = 40;
    config
}

#[test]
fn test_train_model_scores_every_partition() {
    let splits = common::create_linear_splits(300);
    let trained = train_model(ModelKind::LinearRegression, &splits, &quick_config()).unwrap();
    let result = &trained.result;

    assert_eq!(result.model, ModelKind::LinearRegression);
    assert!(result.validation.r2 > 0.999_999);
    assert!(result.test.r2 > 0.999_999);
    assert!(result.cv_r2_mean > 0.999_999);
    assert!(result.training_time >= 0.0);
    assert!(result.feature_importances.is_none());

    // Linear models rank features by absolute coefficient
    assert_eq!(trained.ranking[0].0, "x0");
    assert_eq!(trained.ranking[1].0, "x1");
}

#[test]
fn test_tree_models_report_importances() {
    let splits = common::create_linear_splits(300);
    let trained = train_model(ModelKind::RandomForest, &splits, &quick_config()).unwrap();

    let importances = trained.result.feature_importances.as_ref().unwrap();
    assert_eq!(importances.len(), 3);
    common::assert_close(importances.values().sum::<f64>(), 1.0, 1e-9);

    let top = trained.result.top_importances(2);
    assert_eq!(top.len(), 2);
    assert!(top[0].1 >= top[1].1);
}

#[test]
fn test_train_models_keeps_requested_order() {
    let splits = common::create_linear_splits(200);
    let kinds = [ModelKind::GradientBoosting, ModelKind::LinearRegression];

    let trained = train_models(&kinds, &splits, &quick_config()).unwrap();
    let order: Vec<ModelKind> = trained.iter().map(|t| t.result.model).collect();
    assert_eq!(order, kinds.to_vec());
}

#[test]
fn test_cross_validation_uses_fresh_models() {
    let splits = common::create_linear_splits(200);
    let design = Design::from_frame(&splits.train).unwrap();

    let r2 = cross_val_r2(ModelKind::LinearRegression, &quick_config(), &design).unwrap();
    assert!(r2 > 0.999_999);
}

#[test]
fn test_save_and_reload_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let splits = common::create_linear_splits(200);
    let trained = train_model(ModelKind::RandomForest, &splits, &quick_config()).unwrap();

    let (model_file, results_file) = save_trained(&trained, temp_dir.path()).unwrap();
    assert_eq!(model_file, model_path(temp_dir.path(), ModelKind::RandomForest));
    assert_eq!(results_file, results_path(temp_dir.path(), ModelKind::RandomForest));

    let record = TrainingResult::load(&results_file).unwrap();
    assert_eq!(record.model, ModelKind::RandomForest);
    assert_eq!(record.timestamp, trained.result.timestamp);
    common::assert_close(record.test.r2, trained.result.test.r2, 1e-12);
    common::assert_close(record.cv_r2_mean, trained.result.cv_r2_mean, 1e-12);

    let json = std::fs::read_to_string(&results_file).unwrap();
    assert!(json.contains("\"R2\""));
    assert!(json.contains("\"cv_r2_mean\""));

    let model = load_model(&model_file).unwrap();
    let test = Design::from_frame(&splits.test).unwrap();
    let reloaded = model.predict(&test.x).unwrap();
    let original = trained.model.predict(&test.x).unwrap();
    for (a, b) in original.iter().zip(&reloaded) {
        common::assert_close(*b, *a, 1e-9 * a.abs().max(1.0));
    }
}

#[test]
fn test_missing_result_record_is_data_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let err = TrainingResult::load(&results_path(temp_dir.path(), ModelKind::LinearRegression))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::DataUnavailable { .. })
    ));
}
