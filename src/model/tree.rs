//! CART regression trees (squared error), the building block of both ensembles

use faer::Mat;
use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        value: f64,
    },
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a flat node arena (root at index 0)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<Node>,
    pub n_features: usize,
    /// Total squared-error decrease contributed by splits on each feature
    pub impurity_decrease: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct Builder<'a> {
    columns: &'a [Vec<f64>],
    y: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Fit on the rows listed in `samples` (repeats allowed, as in a bootstrap).
    ///
    /// `columns` is column-major: `columns[feature][row]`.
    pub fn fit(columns: &[Vec<f64>], y: &[f64], samples: Vec<usize>, params: TreeParams) -> Self {
        let mut builder = Builder {
            columns,
            y,
            params,
            nodes: Vec::new(),
            impurity_decrease: vec![0.0; columns.len()],
        };

        if samples.is_empty() {
            builder.nodes.push(Node::Leaf { value: 0.0 });
        } else {
            builder.grow(samples, 0);
        }

        Self {
            nodes: builder.nodes,
            n_features: columns.len(),
            impurity_decrease: builder.impurity_decrease,
        }
    }

    /// Predict one row given a feature accessor
    pub fn predict_one(&self, value: impl Fn(usize) -> f64) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if value(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn predict(&self, x: &Mat<f64>) -> Vec<f64> {
        (0..x.nrows())
            .map(|i| self.predict_one(|f| x[(i, f)]))
            .collect()
    }

    /// Importances scaled to sum to 1 (all zeros for a single-leaf tree)
    pub fn normalized_importances(&self) -> Vec<f64> {
        normalize(&self.impurity_decrease)
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

impl Builder<'_> {
    /// Grow the subtree for `samples` and return its node index
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let n = samples.len();
        let mean = samples.iter().map(|&i| self.y[i]).sum::<f64>() / n as f64;

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        let too_small = n < self.params.min_samples_split || n < 2 * self.params.min_samples_leaf;
        if depth_reached || too_small || self.is_pure(&samples) {
            return idx;
        }

        let Some(best) = self.best_split(&samples, mean) else {
            return idx;
        };

        let column = &self.columns[best.feature];
        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| column[i] <= best.threshold);

        self.impurity_decrease[best.feature] += best.gain;

        let left_idx = self.grow(left, depth + 1);
        let right_idx = self.grow(right, depth + 1);

        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: left_idx,
            right: right_idx,
        };

        idx
    }

    fn is_pure(&self, samples: &[usize]) -> bool {
        let first = self.y[samples[0]];
        samples.iter().all(|&i| self.y[i] == first)
    }

    /// Exhaustive search over midpoints between distinct sorted values.
    ///
    /// Targets are centered on the node mean, so the score of a split is
    /// `L²/nL + R²/nR`, which equals the squared-error decrease.
    fn best_split(&self, samples: &[usize], mean: f64) -> Option<BestSplit> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = samples.iter().map(|&i| self.y[i] - mean).sum();

        let mut best: Option<BestSplit> = None;
        let mut order = samples.to_vec();

        for (feature, column) in self.columns.iter().enumerate() {
            order.sort_by(|&a, &b| column[a].total_cmp(&column[b]));

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += self.y[order[k - 1]] - mean;

                if k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let lo = column[order[k - 1]];
                let hi = column[order[k]];
                if lo >= hi {
                    continue;
                }

                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;

                if best.as_ref().map_or(true, |b| gain > b.gain) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Scale non-negative values to sum to 1; an all-zero input stays all zero
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter().map(|v| v / total).collect()
    } else {
        vec![0.0; values.len()]
    }
}
