//! Correlation-based feature selection against the target

use anyhow::Result;
use rayon::prelude::*;

use super::error::PipelineError;
use super::frame::LabeledFrame;

/// Features whose absolute correlation with the target is below this are dropped
pub const MIN_TARGET_CORRELATION: f64 = 0.05;

/// Correlation of one feature with the target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetCorrelation {
    pub feature: String,
    pub correlation: f64,
}

/// Outcome of the selection step
#[derive(Debug, Clone)]
pub struct FeatureSelection {
    /// All candidate correlations, sorted by absolute value descending
    pub correlations: Vec<TargetCorrelation>,
    pub kept: Vec<String>,
    pub dropped: Vec<String>,
}

/// Pearson correlation using a single-pass Welford update.
///
/// Returns `None` for empty or mismatched input and when either side has zero variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        count += 1.0;
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (xi - mean_x);
        var_y += dy * (yi - mean_y);
        cov_xy += dx * (yi - mean_y);
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    if r.is_nan() {
        None
    } else {
        Some(r)
    }
}

/// Correlate every feature column with the target.
///
/// Undefined correlations (constant columns) are reported as 0.
pub fn correlations_with_target(frame: &LabeledFrame) -> Result<Vec<TargetCorrelation>> {
    let target = frame.target_values()?;

    let columns: Vec<(String, Vec<f64>)> = frame
        .feature_names()
        .into_iter()
        .map(|name| {
            let values = frame.feature_values(&name)?;
            Ok((name, values))
        })
        .collect::<Result<_>>()?;

    let mut correlations: Vec<TargetCorrelation> = columns
        .par_iter()
        .map(|(name, values)| TargetCorrelation {
            feature: name.clone(),
            correlation: pearson_correlation(values, &target).unwrap_or(0.0),
        })
        .collect();

    // Sort by absolute correlation descending
    correlations.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(correlations)
}

/// Names of the features below [`MIN_TARGET_CORRELATION`]
pub fn get_low_correlation_features(correlations: &[TargetCorrelation]) -> Vec<String> {
    correlations
        .iter()
        .filter(|c| c.correlation.abs() < MIN_TARGET_CORRELATION)
        .map(|c| c.feature.clone())
        .collect()
}

/// Drop weakly correlated features. Fails with `NoFeaturesRemain` if none survive.
pub fn select_features(frame: &LabeledFrame) -> Result<(LabeledFrame, FeatureSelection)> {
    let correlations = correlations_with_target(frame)?;
    let dropped = get_low_correlation_features(&correlations);

    if dropped.len() == correlations.len() {
        return Err(PipelineError::NoFeaturesRemain {
            threshold: MIN_TARGET_CORRELATION,
            candidates: correlations.len(),
        }
        .into());
    }

    let selected = frame.drop_features(&dropped);
    let kept = selected.feature_names();

    Ok((
        selected,
        FeatureSelection {
            correlations,
            kept,
            dropped,
        },
    ))
}
