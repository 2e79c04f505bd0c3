//! One trainer for every estimator: fit, score, cross-validate, persist

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::boosting::BoostingParams;
use super::estimator::{Model, ModelKind, Regressor};
use super::forest::ForestParams;
use super::matrix::Design;
use super::metrics::{evaluate, r2_score, RegressionMetrics};
use crate::pipeline::{DataSplits, PipelineError, DEFAULT_SEED};

/// Estimator settings shared by every trainer run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub seed: u64,
    pub cv_folds: usize,
    pub forest: ForestParams,
    pub boosting: BoostingParams,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            cv_folds: 5,
            forest: ForestParams::default(),
            boosting: BoostingParams::default(),
        }
    }
}

impl TrainerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.forest.seed = seed;
        self
    }

    pub fn build(&self, kind: ModelKind) -> Model {
        kind.build(&self.forest, &self.boosting)
    }
}

/// The persisted result record of one trainer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model: ModelKind,
    /// Wall-clock seconds spent in `fit` on the training partition
    pub training_time: f64,
    pub validation: RegressionMetrics,
    pub test: RegressionMetrics,
    pub cv_r2_mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<BTreeMap<String, f64>>,
    pub timestamp: String,
    pub version: String,
}

impl TrainingResult {
    /// Importances sorted descending, at most `k`
    pub fn top_importances(&self, k: usize) -> Vec<(String, f64)> {
        self.feature_importances
            .as_ref()
            .map(|map| rank(map.iter().map(|(name, v)| (name.clone(), *v)).collect(), k))
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize training result to JSON")?;

        std::fs::write(path, json).map_err(|e| PipelineError::io_failure(path, e))?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::data_unavailable(path, e.to_string()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse training result from {}", path.display()))
    }
}

/// A fitted model together with its result record
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: Model,
    pub result: TrainingResult,
    /// Per-feature weights for display, sorted descending: importances, or
    /// absolute coefficients for the linear model
    pub ranking: Vec<(String, f64)>,
}

/// `model_<code>.json` inside `dir`
pub fn model_path(dir: &Path, kind: ModelKind) -> PathBuf {
    dir.join(format!("model_{}.json", kind.code()))
}

/// `results_<code>.json` inside `dir`
pub fn results_path(dir: &Path, kind: ModelKind) -> PathBuf {
    dir.join(format!("results_{}.json", kind.code()))
}

/// Contiguous, unshuffled folds; the first `n % k` folds get one extra row.
///
/// Returns `(train_positions, held_out_positions)` per fold.
pub fn kfold_indices(n: usize, k: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
    if k < 2 || k > n {
        return Err(PipelineError::InvalidInput(format!(
            "cannot build {} fold(s) from {} row(s)",
            k, n
        ))
        .into());
    }

    let base = n / k;
    let extra = n % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;

    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        let end = start + size;
        let held: Vec<usize> = (start..end).collect();
        let train: Vec<usize> = (0..start).chain(end..n).collect();
        folds.push((train, held));
        start = end;
    }

    Ok(folds)
}

/// Mean held-out R² of fresh estimators fitted on each fold's training rows
pub fn cross_val_r2(kind: ModelKind, config: &TrainerConfig, design: &Design) -> Result<f64> {
    let folds = kfold_indices(design.n_rows(), config.cv_folds)?;

    let scores: Vec<f64> = folds
        .par_iter()
        .map(|(train_pos, held_pos)| -> Result<f64> {
            let train = design.subset(train_pos);
            let held = design.subset(held_pos);

            let mut model = config.build(kind);
            model.fit(&train.x, &train.y)?;
            let pred = model.predict(&held.x)?;
            Ok(r2_score(&held.y, &pred))
        })
        .collect::<Result<_>>()?;

    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Fit `kind` on the training partition and score it on validation and test
pub fn train_model(kind: ModelKind, splits: &DataSplits, config: &TrainerConfig) -> Result<TrainedModel> {
    let train = Design::from_frame(&splits.train).context("Failed to build training matrix")?;
    let validation = Design::from_frame(&splits.validation).context("Failed to build validation matrix")?;
    let test = Design::from_frame(&splits.test).context("Failed to build test matrix")?;

    let mut model = config.build(kind);

    let start = Instant::now();
    model
        .fit(&train.x, &train.y)
        .with_context(|| format!("Failed to fit {}", kind))?;
    let training_time = start.elapsed().as_secs_f64();

    let validation_metrics = evaluate(&validation.y, &model.predict(&validation.x)?)?;
    let test_metrics = evaluate(&test.y, &model.predict(&test.x)?)?;
    let cv_r2_mean = cross_val_r2(kind, config, &train)
        .with_context(|| format!("Cross-validation failed for {}", kind))?;

    let feature_importances: Option<BTreeMap<String, f64>> = model.feature_importances().map(|values| {
        train
            .feature_names
            .iter()
            .cloned()
            .zip(values)
            .collect()
    });

    let ranking = match (&model, &feature_importances) {
        (Model::LinearRegression(lr), _) => rank(
            train
                .feature_names
                .iter()
                .cloned()
                .zip(lr.coefficient_magnitudes())
                .collect(),
            usize::MAX,
        ),
        (_, Some(map)) => rank(map.iter().map(|(n, v)| (n.clone(), *v)).collect(), usize::MAX),
        (_, None) => Vec::new(),
    };

    let result = TrainingResult {
        model: kind,
        training_time,
        validation: validation_metrics,
        test: test_metrics,
        cv_r2_mean,
        feature_importances,
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Ok(TrainedModel {
        model,
        result,
        ranking,
    })
}

/// Train several estimators concurrently.
///
/// Inputs are shared read-only; results come back in the order of `kinds`.
pub fn train_models(kinds: &[ModelKind], splits: &DataSplits, config: &TrainerConfig) -> Result<Vec<TrainedModel>> {
    kinds
        .par_iter()
        .map(|&kind| train_model(kind, splits, config))
        .collect()
}

/// Write `model_<code>.json` and `results_<code>.json` into `dir`
pub fn save_trained(trained: &TrainedModel, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let kind = trained.result.model;

    let model_file = model_path(dir, kind);
    let json = serde_json::to_string(&trained.model)
        .with_context(|| format!("Failed to serialize {}", kind))?;
    std::fs::write(&model_file, json).map_err(|e| PipelineError::io_failure(&model_file, e))?;

    let results_file = results_path(dir, kind);
    trained.result.save(&results_file)?;

    Ok((model_file, results_file))
}

/// Load a model written by [`save_trained`]
pub fn load_model(path: &Path) -> Result<Model> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::data_unavailable(path, e.to_string()))?;

    serde_json::from_str(&json).with_context(|| format!("Failed to parse model from {}", path.display()))
}

fn rank(mut entries: Vec<(String, f64)>, k: usize) -> Vec<(String, f64)> {
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(k);
    entries
}
