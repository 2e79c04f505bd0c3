//! Model module - regressors, metrics and the trainer

pub mod boosting;
pub mod estimator;
pub mod forest;
pub mod linear;
pub mod matrix;
pub mod metrics;
pub mod trainer;
pub mod tree;

pub use boosting::{BoostingParams, GradientBoosting};
pub use estimator::{Model, ModelKind, Regressor};
pub use forest::{ForestParams, RandomForest};
pub use linear::LinearRegression;
pub use matrix::Design;
pub use metrics::*;
pub use trainer::*;
pub use tree::{RegressionTree, TreeParams};
