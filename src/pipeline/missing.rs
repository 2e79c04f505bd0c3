//! Missing value analysis and median imputation

use anyhow::Result;
use polars::prelude::*;

use super::loader::ROW_ID;

/// Missing value count for one column
#[derive(Debug, Clone, PartialEq)]
pub struct MissingStat {
    pub column: String,
    pub missing: usize,
    pub ratio: f64,
}

/// Count missing values in every column except the row id.
///
/// Sorted by missing count descending.
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<MissingStat>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut stats: Vec<MissingStat> = df
        .get_columns()
        .iter()
        .filter(|col| col.name().as_str() != ROW_ID)
        .map(|col| {
            let missing = col.null_count();
            MissingStat {
                column: col.name().to_string(),
                missing,
                ratio: missing as f64 / rows,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.missing.cmp(&a.missing));

    Ok(stats)
}

/// Columns that have at least one missing value
pub fn columns_with_missing(stats: &[MissingStat]) -> Vec<&MissingStat> {
    stats.iter().filter(|s| s.missing > 0).collect()
}

/// Median of the observed values; even counts average the two middle values.
///
/// NaN is treated as missing. Returns `None` when nothing was observed.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut observed: Vec<f64> = values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| !v.is_nan())
        .collect();

    if observed.is_empty() {
        return None;
    }

    observed.sort_by(f64::total_cmp);
    let mid = observed.len() / 2;

    if observed.len() % 2 == 0 {
        Some((observed[mid - 1] + observed[mid]) / 2.0)
    } else {
        Some(observed[mid])
    }
}

/// Replace missing (and NaN) values with `fill`
pub fn impute(values: &[Option<f64>], fill: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| match v {
            Some(x) if !x.is_nan() => *x,
            _ => fill,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[Some(3.0), Some(1.0), Some(2.0)]), Some(2.0));
        assert_eq!(median(&[Some(4.0), Some(1.0), Some(3.0), Some(2.0)]), Some(2.5));
    }

    #[test]
    fn test_median_skips_missing() {
        assert_eq!(median(&[None, Some(10.0), Some(f64::NAN), Some(20.0)]), Some(15.0));
        assert_eq!(median(&[None, None]), None);
    }

    #[test]
    fn test_impute_fills_gaps() {
        let filled = impute(&[Some(1.0), None, Some(f64::NAN), Some(4.0)], 2.5);
        assert_eq!(filled, vec![1.0, 2.5, 2.5, 4.0]);
    }
}
