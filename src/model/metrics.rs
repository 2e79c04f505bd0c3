//! Regression metrics

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// R², RMSE and MAE of one prediction set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    #[serde(rename = "R2")]
    pub r2: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "MAE")]
    pub mae: f64,
}

/// Coefficient of determination.
///
/// A constant `y_true` scores 1.0 on a perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p) * (t - p)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let mse = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f64>()
        / y_true.len() as f64;
    mse.sqrt()
}

pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum::<f64>() / y_true.len() as f64
}

/// All three metrics; the inputs must be non-empty and the same length
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<RegressionMetrics> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return Err(PipelineError::InvalidInput(format!(
            "cannot score {} prediction(s) against {} target(s)",
            y_pred.len(),
            y_true.len()
        ))
        .into());
    }

    Ok(RegressionMetrics {
        r2: r2_score(y_true, y_pred),
        rmse: root_mean_squared_error(y_true, y_pred),
        mae: mean_absolute_error(y_true, y_pred),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_computed_metrics() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];

        let m = evaluate(&y_true, &y_pred).unwrap();

        // ss_res = 0.25 + 0.25 + 0 + 1 = 1.5; ss_tot = 29.1875
        assert!((m.r2 - (1.0 - 1.5 / 29.1875)).abs() < 1e-12);
        assert!((m.rmse - (1.5f64 / 4.0).sqrt()).abs() < 1e-12);
        assert!((m.mae - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 2.0]), 1.0);
        assert_eq!(r2_score(&[2.0, 2.0], &[1.0, 3.0]), 0.0);
    }

    #[test]
    fn test_evaluate_rejects_mismatch() {
        assert!(evaluate(&[1.0, 2.0], &[1.0]).is_err());
        assert!(evaluate(&[], &[]).is_err());
    }

    #[test]
    fn test_metrics_serialize_with_short_names() {
        let m = RegressionMetrics {
            r2: 0.5,
            rmse: 1.0,
            mae: 2.0,
        };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"R2":0.5,"RMSE":1.0,"MAE":2.0}"#);
    }
}
