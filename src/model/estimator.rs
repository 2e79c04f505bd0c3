//! The estimator seam shared by the three regressors

use std::fmt;

use anyhow::Result;
use faer::Mat;
use serde::{Deserialize, Serialize};

use super::boosting::{BoostingParams, GradientBoosting};
use super::forest::{ForestParams, RandomForest};
use super::linear::LinearRegression;

/// Capability set every regressor provides
pub trait Regressor {
    fn fit(&mut self, x: &Mat<f64>, y: &[f64]) -> Result<()>;

    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>>;

    /// Normalized per-feature importances, for estimators that have them
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Which regressor to train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LinearRegression,
    RandomForest,
    GradientBoosting,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LinearRegression,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ];

    /// Short code used in artifact names (`model_<code>.json`)
    pub fn code(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "lr",
            ModelKind::RandomForest => "rf",
            ModelKind::GradientBoosting => "gbr",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "Linear Regression (LR)",
            ModelKind::RandomForest => "Random Forest (RF)",
            ModelKind::GradientBoosting => "Gradient Boosting (GBR)",
        }
    }

    /// An unfitted estimator of this kind
    pub fn build(&self, forest: &ForestParams, boosting: &BoostingParams) -> Model {
        match self {
            ModelKind::LinearRegression => Model::LinearRegression(LinearRegression::new()),
            ModelKind::RandomForest => Model::RandomForest(RandomForest::new(forest.clone())),
            ModelKind::GradientBoosting => {
                Model::GradientBoosting(GradientBoosting::new(boosting.clone()))
            }
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A regressor of any kind; this is what gets serialized to `model_<code>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    LinearRegression(LinearRegression),
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::LinearRegression(_) => ModelKind::LinearRegression,
            Model::RandomForest(_) => ModelKind::RandomForest,
            Model::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            Model::LinearRegression(m) => m,
            Model::RandomForest(m) => m,
            Model::GradientBoosting(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Regressor {
        match self {
            Model::LinearRegression(m) => m,
            Model::RandomForest(m) => m,
            Model::GradientBoosting(m) => m,
        }
    }
}

impl Regressor for Model {
    fn fit(&mut self, x: &Mat<f64>, y: &[f64]) -> Result<()> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        self.inner().predict(x)
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.inner().feature_importances()
    }
}

/// Shared shape check for `fit`
pub(crate) fn check_fit_input(x: &Mat<f64>, y: &[f64]) -> Result<()> {
    use crate::pipeline::PipelineError;

    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(PipelineError::InvalidInput("cannot fit on an empty matrix".to_string()).into());
    }
    if x.nrows() != y.len() {
        return Err(PipelineError::InvalidInput(format!(
            "{} feature rows but {} target values",
            x.nrows(),
            y.len()
        ))
        .into());
    }
    Ok(())
}

/// Shared shape check for `predict`
pub(crate) fn check_predict_input(x: &Mat<f64>, n_features: usize) -> Result<()> {
    use crate::pipeline::PipelineError;

    if n_features == 0 {
        return Err(PipelineError::InvalidInput("model has not been fitted".to_string()).into());
    }
    if x.ncols() != n_features {
        return Err(PipelineError::InvalidInput(format!(
            "model was fitted on {} feature(s), got {}",
            n_features,
            x.ncols()
        ))
        .into());
    }
    Ok(())
}
