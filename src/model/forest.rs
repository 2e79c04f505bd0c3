//! Random forest regressor: bootstrap-aggregated CART trees

use anyhow::Result;
use faer::Mat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::estimator::{check_fit_input, check_predict_input, Regressor};
use super::matrix::columns_of;
use super::tree::{normalize, RegressionTree, TreeParams};
use crate::pipeline::DEFAULT_SEED;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub params: ForestParams,
    pub trees: Vec<RegressionTree>,
    pub n_features: usize,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            n_features: 0,
        }
    }
}

impl Regressor for RandomForest {
    /// Trees are grown in parallel; tree `t` draws its bootstrap from `seed + t`,
    /// so the fitted forest does not depend on thread scheduling.
    fn fit(&mut self, x: &Mat<f64>, y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        let columns = columns_of(x);
        let n = x.nrows();
        let params = &self.params;

        self.trees = (0..params.n_estimators.max(1))
            .into_par_iter()
            .map(|t| {
                let samples: Vec<usize> = if params.bootstrap {
                    let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(&columns, y, samples, params.tree)
            })
            .collect();
        self.n_features = x.ncols();

        Ok(())
    }

    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        check_predict_input(x, self.n_features)?;

        let count = self.trees.len() as f64;
        Ok((0..x.nrows())
            .into_par_iter()
            .map(|i| {
                self.trees
                    .iter()
                    .map(|tree| tree.predict_one(|f| x[(i, f)]))
                    .sum::<f64>()
                    / count
            })
            .collect())
    }

    /// Mean of each tree's normalized impurity decrease
    fn feature_importances(&self) -> Option<Vec<f64>> {
        if self.trees.is_empty() {
            return None;
        }

        let mut sum = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (slot, v) in sum.iter_mut().zip(tree.normalized_importances()) {
                *slot += v;
            }
        }

        Some(normalize(&sum))
    }
}
