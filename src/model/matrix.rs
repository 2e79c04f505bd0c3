//! Dense design matrices built from feature tables

use anyhow::Result;
use faer::Mat;

use crate::pipeline::LabeledFrame;

/// Features as an `n_rows x n_features` matrix plus the target vector
#[derive(Debug, Clone)]
pub struct Design {
    pub x: Mat<f64>,
    pub y: Vec<f64>,
    pub feature_names: Vec<String>,
}

impl Design {
    pub fn from_frame(frame: &LabeledFrame) -> Result<Self> {
        let feature_names = frame.feature_names();
        let y = frame.target_values()?;

        let mut x = Mat::<f64>::zeros(frame.height(), feature_names.len());
        for (col_idx, name) in feature_names.iter().enumerate() {
            for (row_idx, value) in frame.feature_values(name)?.into_iter().enumerate() {
                x[(row_idx, col_idx)] = value;
            }
        }

        Ok(Self {
            x,
            y,
            feature_names,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    /// Rows at `positions`, in order
    pub fn subset(&self, positions: &[usize]) -> Self {
        Self {
            x: select_rows(&self.x, positions),
            y: positions.iter().map(|&p| self.y[p]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }
}

/// Copy the given rows of `x` into a new matrix
pub fn select_rows(x: &Mat<f64>, positions: &[usize]) -> Mat<f64> {
    let mut out = Mat::<f64>::zeros(positions.len(), x.ncols());
    for (row_idx, &p) in positions.iter().enumerate() {
        for col_idx in 0..x.ncols() {
            out[(row_idx, col_idx)] = x[(p, col_idx)];
        }
    }
    out
}

/// Column-major copy of `x`, the layout tree building scans
pub fn columns_of(x: &Mat<f64>) -> Vec<Vec<f64>> {
    (0..x.ncols())
        .map(|j| (0..x.nrows()).map(|i| x[(i, j)]).collect())
        .collect()
}

/// Build a matrix from row slices (all rows the same length)
pub fn from_rows(rows: &[Vec<f64>]) -> Mat<f64> {
    let n_cols = rows.first().map_or(0, |r| r.len());
    let mut x = Mat::<f64>::zeros(rows.len(), n_cols);
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
    }
    x
}
