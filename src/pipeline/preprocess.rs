//! Column-wise imputation, standardization and one-hot encoding
//!
//! The fitted [`Preprocessor`] holds every statistic it needs, so fitting on
//! one frame and transforming another is possible. The pipeline fits on the
//! full dataset before splitting, which reproduces the reference outputs but
//! lets validation and test rows influence the scaler and encoder.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use super::loader::{CATEGORICAL_COLUMN, NUMERIC_FEATURES, ROW_ID};
use super::missing::{impute, median};

/// Prefix of standardized numeric columns
pub const SCALED_PREFIX: &str = "scaled_";

/// Prefix of one-hot indicator columns
pub const CATEGORY_PREFIX: &str = "cat_";

/// Imputation and scaling statistics of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub name: String,
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation, or 1.0 for a constant column
    pub scale: f64,
}

/// Fitted preprocessing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub numeric: Vec<NumericStats>,
    pub categorical: String,
    /// Observed categories, sorted
    pub categories: Vec<String>,
    /// Numeric columns with no observed value, left out of the output
    pub dropped_empty: Vec<String>,
}

impl Preprocessor {
    /// Fit on the default housing schema
    pub fn fit(raw: &DataFrame) -> Result<Self> {
        Self::fit_columns(raw, &NUMERIC_FEATURES, CATEGORICAL_COLUMN)
    }

    /// Fit on an explicit set of numeric columns and one categorical column
    pub fn fit_columns(raw: &DataFrame, numeric: &[&str], categorical: &str) -> Result<Self> {
        if raw.height() == 0 {
            return Err(PipelineError::InvalidInput("cannot fit on an empty table".to_string()).into());
        }

        let mut stats = Vec::with_capacity(numeric.len());
        let mut dropped_empty = Vec::new();

        for &name in numeric {
            let values = optional_values(raw, name)?;
            let Some(fill) = median(&values) else {
                dropped_empty.push(name.to_string());
                continue;
            };

            let filled = impute(&values, fill);
            let (mean, std) = mean_and_std(&filled);

            stats.push(NumericStats {
                name: name.to_string(),
                median: fill,
                mean,
                scale: if std > 0.0 { std } else { 1.0 },
            });
        }

        let categories: BTreeSet<String> = category_values(raw, categorical)?
            .into_iter()
            .flatten()
            .collect();

        Ok(Self {
            numeric: stats,
            categorical: categorical.to_string(),
            categories: categories.into_iter().collect(),
            dropped_empty,
        })
    }

    /// Output column names in table order (row id excluded)
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric
            .iter()
            .map(|s| format!("{}{}", SCALED_PREFIX, s.name))
            .chain(
                self.categories
                    .iter()
                    .map(|c| format!("{}{}", CATEGORY_PREFIX, c)),
            )
            .collect()
    }

    /// Produce the numeric feature table for `raw`, keeping its `row_id`.
    ///
    /// Categories not seen during fitting (and missing categories) become all-zero indicators.
    pub fn transform(&self, raw: &DataFrame) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(1 + self.numeric.len() + self.categories.len());
        columns.push(
            raw.column(ROW_ID)
                .with_context(|| format!("Column '{}' not found", ROW_ID))?
                .clone(),
        );

        for stats in &self.numeric {
            let values = optional_values(raw, &stats.name)?;
            let scaled: Vec<f64> = impute(&values, stats.median)
                .into_iter()
                .map(|x| (x - stats.mean) / stats.scale)
                .collect();
            columns.push(Column::new(
                format!("{}{}", SCALED_PREFIX, stats.name).into(),
                scaled,
            ));
        }

        let labels = category_values(raw, &self.categorical)?;
        for category in &self.categories {
            let indicator: Vec<f64> = labels
                .iter()
                .map(|label| match label {
                    Some(l) if l == category => 1.0,
                    _ => 0.0,
                })
                .collect();
            columns.push(Column::new(
                format!("{}{}", CATEGORY_PREFIX, category).into(),
                indicator,
            ));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Fit on `raw` and transform it in one step
    pub fn fit_transform(raw: &DataFrame) -> Result<(Self, DataFrame)> {
        let preprocessor = Self::fit(raw)?;
        let features = preprocessor.transform(raw)?;
        Ok((preprocessor, features))
    }

    /// Persist the fitted statistics as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize preprocessor to JSON")?;

        std::fs::write(path, json).map_err(|e| PipelineError::io_failure(path, e))?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::data_unavailable(path, e.to_string()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse preprocessor from {}", path.display()))
    }
}

fn optional_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    let values = column.as_materialized_series().f64()?.iter().collect();
    Ok(values)
}

fn category_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Categorical column '{}' not found", name))?
        .cast(&DataType::String)?;

    let values = column
        .as_materialized_series()
        .str()?
        .iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Mean and population standard deviation
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std_population() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_names_order() {
        let pre = Preprocessor {
            numeric: vec![NumericStats {
                name: "Population".to_string(),
                median: 1.0,
                mean: 1.0,
                scale: 1.0,
            }],
            categorical: CATEGORICAL_COLUMN.to_string(),
            categories: vec!["INLAND".to_string(), "NEAR BAY".to_string()],
            dropped_empty: Vec::new(),
        };

        assert_eq!(
            pre.feature_names(),
            vec!["scaled_Population", "cat_INLAND", "cat_NEAR BAY"]
        );
    }
}
