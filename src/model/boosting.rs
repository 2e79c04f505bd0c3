//! Gradient boosting regressor with squared-error loss

use anyhow::Result;
use faer::Mat;
use serde::{Deserialize, Serialize};

use super::estimator::{check_fit_input, check_predict_input, Regressor};
use super::matrix::columns_of;
use super::tree::{normalize, RegressionTree, TreeParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub tree: TreeParams,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            tree: TreeParams {
                max_depth: Some(3),
                ..TreeParams::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoosting {
    pub params: BoostingParams,
    /// Initial prediction, the training target mean
    pub init: f64,
    pub trees: Vec<RegressionTree>,
    pub n_features: usize,
}

impl GradientBoosting {
    pub fn new(params: BoostingParams) -> Self {
        Self {
            params,
            init: 0.0,
            trees: Vec::new(),
            n_features: 0,
        }
    }
}

impl Regressor for GradientBoosting {
    /// Each stage fits a tree to the current residuals (the negative gradient
    /// of squared error) and adds a shrunken copy of it to the ensemble.
    fn fit(&mut self, x: &Mat<f64>, y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        let columns = columns_of(x);
        let n = y.len();
        let rate = self.params.learning_rate;

        self.init = y.iter().sum::<f64>() / n as f64;
        self.trees = Vec::with_capacity(self.params.n_estimators);

        let mut current = vec![self.init; n];
        for _ in 0..self.params.n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&current).map(|(t, p)| t - p).collect();
            let tree = RegressionTree::fit(&columns, &residuals, (0..n).collect(), self.params.tree);

            for (i, slot) in current.iter_mut().enumerate() {
                *slot += rate * tree.predict_one(|f| columns[f][i]);
            }
            self.trees.push(tree);
        }
        self.n_features = x.ncols();

        Ok(())
    }

    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        check_predict_input(x, self.n_features)?;

        let rate = self.params.learning_rate;
        Ok((0..x.nrows())
            .map(|i| {
                self.init
                    + self
                        .trees
                        .iter()
                        .map(|tree| rate * tree.predict_one(|f| x[(i, f)]))
                        .sum::<f64>()
            })
            .collect())
    }

    /// Impurity decrease summed over all stages, normalized to 1
    fn feature_importances(&self) -> Option<Vec<f64>> {
        if self.trees.is_empty() {
            return None;
        }

        let mut sum = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (slot, v) in sum.iter_mut().zip(&tree.impurity_decrease) {
                *slot += v;
            }
        }

        Some(normalize(&sum))
    }
}
