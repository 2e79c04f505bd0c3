//! Row-aligned feature and target tables

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::PipelineError;
use super::loader::{ROW_ID, TARGET_COLUMN};

/// A feature table and its target vector, both keyed by `row_id`.
///
/// Every operation returns a new frame and applies the same row selection to
/// both tables, so the two sides never drift apart.
#[derive(Debug, Clone)]
pub struct LabeledFrame {
    features: DataFrame,
    target: DataFrame,
}

impl LabeledFrame {
    /// Pair a feature table with a target table, checking their row identities match
    pub fn new(features: DataFrame, target: DataFrame) -> Result<Self> {
        let feature_ids = row_ids(&features).context("Feature table has no usable row ids")?;
        let target_ids = row_ids(&target).context("Target table has no usable row ids")?;

        if feature_ids != target_ids {
            return Err(PipelineError::SchemaMismatch(format!(
                "feature table ({} rows) and target ({} rows) are not row-aligned",
                feature_ids.len(),
                target_ids.len()
            ))
            .into());
        }

        target
            .column(TARGET_COLUMN)
            .with_context(|| format!("Target table is missing '{}'", TARGET_COLUMN))?;

        Ok(Self { features, target })
    }

    pub fn features(&self) -> &DataFrame {
        &self.features
    }

    pub fn target(&self) -> &DataFrame {
        &self.target
    }

    pub fn height(&self) -> usize {
        self.features.height()
    }

    /// Feature column names, in table order, without the row id
    pub fn feature_names(&self) -> Vec<String> {
        self.features
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name != ROW_ID)
            .collect()
    }

    pub fn row_ids(&self) -> Result<Vec<u32>> {
        row_ids(&self.features)
    }

    pub fn target_values(&self) -> Result<Vec<f64>> {
        column_values(&self.target, TARGET_COLUMN)
    }

    pub fn feature_values(&self, name: &str) -> Result<Vec<f64>> {
        column_values(&self.features, name)
    }

    /// Select rows by position, in the given order
    pub fn take_rows(&self, positions: &[usize]) -> Result<Self> {
        let indices: Vec<IdxSize> = positions.iter().map(|&p| p as IdxSize).collect();
        let idx = IdxCa::from_vec("idx".into(), indices);

        Ok(Self {
            features: self.features.take(&idx)?,
            target: self.target.take(&idx)?,
        })
    }

    /// Remove the named feature columns; the target is never touched
    pub fn drop_features(&self, names: &[String]) -> Self {
        Self {
            features: self.features.drop_many(names.iter().map(|s| s.as_str())),
            target: self.target.clone(),
        }
    }
}

/// Read the row identity column of a table
pub fn row_ids(df: &DataFrame) -> Result<Vec<u32>> {
    let column = df
        .column(ROW_ID)
        .with_context(|| format!("Column '{}' not found", ROW_ID))?
        .cast(&DataType::UInt32)?;

    let ids = column
        .as_materialized_series()
        .u32()?
        .iter()
        .map(|v| v.ok_or_else(|| anyhow::anyhow!("Null value in '{}'", ROW_ID)))
        .collect();
    ids
}

/// Read a complete numeric column as `f64` values
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    let values = column
        .as_materialized_series()
        .f64()?
        .iter()
        .map(|v| v.ok_or_else(|| anyhow::anyhow!("Null value in column '{}'", name)))
        .collect();
    values
}
