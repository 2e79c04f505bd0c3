//! Ordinary least squares with an intercept

use anyhow::Result;
use faer::Mat;
use serde::{Deserialize, Serialize};

use super::estimator::{check_fit_input, check_predict_input, Regressor};

/// Relative ridge added to the Gram diagonal so collinear one-hot blocks stay solvable
const RIDGE_EPS: f64 = 1e-10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute coefficients, the usual stand-in for importance on scaled inputs
    pub fn coefficient_magnitudes(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.abs()).collect()
    }
}

impl Regressor for LinearRegression {
    /// Solve the centered normal equations `XcᵀXc β = Xcᵀ yc`.
    fn fit(&mut self, x: &Mat<f64>, y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        let n = x.nrows();
        let p = x.ncols();

        let x_mean: Vec<f64> = (0..p)
            .map(|j| (0..n).map(|i| x[(i, j)]).sum::<f64>() / n as f64)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n as f64;

        let mut xc = Mat::<f64>::zeros(n, p);
        for j in 0..p {
            for i in 0..n {
                xc[(i, j)] = x[(i, j)] - x_mean[j];
            }
        }

        let gram = xc.transpose() * &xc;

        let mut xty = vec![0.0; p];
        for (j, slot) in xty.iter_mut().enumerate() {
            *slot = (0..n).map(|i| xc[(i, j)] * (y[i] - y_mean)).sum();
        }

        let trace: f64 = (0..p).map(|j| gram[(j, j)]).sum();
        let ridge = RIDGE_EPS * (trace / p as f64).max(f64::MIN_POSITIVE);

        let mut a: Vec<Vec<f64>> = (0..p)
            .map(|i| {
                (0..p)
                    .map(|j| gram[(i, j)] + if i == j { ridge } else { 0.0 })
                    .collect()
            })
            .collect();

        let beta = solve_linear_system(&mut a, xty);

        self.intercept = y_mean - beta.iter().zip(&x_mean).map(|(b, m)| b * m).sum::<f64>();
        self.coefficients = beta;

        Ok(())
    }

    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        check_predict_input(x, self.coefficients.len())?;

        Ok((0..x.nrows())
            .map(|i| {
                self.intercept
                    + self
                        .coefficients
                        .iter()
                        .enumerate()
                        .map(|(j, b)| b * x[(i, j)])
                        .sum::<f64>()
            })
            .collect())
    }
}

/// Gaussian elimination with partial pivoting.
///
/// Pivots that vanish (a column with no variance) give a zero coefficient.
fn solve_linear_system(a: &mut [Vec<f64>], mut b: Vec<f64>) -> Vec<f64> {
    let p = b.len();

    for col in 0..p {
        let pivot_row = (col..p)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);

        if a[pivot_row][col].abs() < f64::EPSILON * f64::EPSILON {
            continue;
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..p {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..p {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = vec![0.0; p];
    for row in (0..p).rev() {
        if a[row][row].abs() < f64::EPSILON * f64::EPSILON {
            continue;
        }
        let tail: f64 = ((row + 1)..p).map(|k| a[row][k] * solution[k]).sum();
        solution[row] = (b[row] - tail) / a[row][row];
    }

    solution
}
