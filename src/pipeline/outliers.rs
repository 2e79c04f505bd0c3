//! Upper-tail outlier removal on the target by interquartile range

use anyhow::Result;

use super::error::PipelineError;
use super::frame::LabeledFrame;

/// Multiplier applied to the IQR above the third quartile
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Quartiles and the derived upper bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub upper_bound: f64,
}

/// What the filter removed
#[derive(Debug, Clone)]
pub struct OutlierReport {
    pub bounds: OutlierBounds,
    pub initial_rows: usize,
    pub removed_row_ids: Vec<u32>,
}

impl OutlierReport {
    pub fn removed(&self) -> usize {
        self.removed_row_ids.len()
    }

    pub fn removed_ratio(&self) -> f64 {
        if self.initial_rows == 0 {
            0.0
        } else {
            self.removed() as f64 / self.initial_rows as f64
        }
    }
}

/// Quantile of sorted data with linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Compute Q1, Q3, IQR and `Q3 + 1.5 * IQR` for `values`
pub fn iqr_bounds(values: &[f64]) -> Result<OutlierBounds> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) else {
        return Err(PipelineError::InvalidInput("cannot compute quartiles of an empty target".to_string()).into());
    };
    let iqr = q3 - q1;

    Ok(OutlierBounds {
        q1,
        q3,
        iqr,
        upper_bound: q3 + IQR_MULTIPLIER * iqr,
    })
}

/// Remove rows whose target is strictly above the upper bound.
///
/// Bounds come from the target distribution of `frame` as given. The lower
/// tail is kept, and surviving rows keep their order.
pub fn remove_target_outliers(frame: &LabeledFrame) -> Result<(LabeledFrame, OutlierReport)> {
    let target = frame.target_values()?;
    let bounds = iqr_bounds(&target)?;
    let row_ids = frame.row_ids()?;

    let mut keep = Vec::with_capacity(target.len());
    let mut removed_row_ids = Vec::new();

    for (pos, (&value, &id)) in target.iter().zip(row_ids.iter()).enumerate() {
        if value > bounds.upper_bound {
            removed_row_ids.push(id);
        } else {
            keep.push(pos);
        }
    }

    let filtered = frame.take_rows(&keep)?;

    Ok((
        filtered,
        OutlierReport {
            bounds,
            initial_rows: target.len(),
            removed_row_ids,
        },
    ))
}
