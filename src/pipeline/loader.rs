//! Dataset loader for the housing CSV (or Parquet) file

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::error::PipelineError;

/// Name of the row identity column carried through every stage
pub const ROW_ID: &str = "row_id";

/// Regression target
pub const TARGET_COLUMN: &str = "Median_House_Value";

/// The single categorical attribute
pub const CATEGORICAL_COLUMN: &str = "Ocean_Proximity";

/// Numeric attributes, in source order
pub const NUMERIC_FEATURES: [&str; 8] = [
    "Longitude",
    "Latitude",
    "Housing_Median_Age",
    "Total_Rooms",
    "Total_Bedrooms",
    "Population",
    "Households",
    "Median_Income",
];

/// Canonical names assigned positionally to the source columns
pub const CANONICAL_COLUMNS: [&str; 10] = [
    "Longitude",
    "Latitude",
    "Housing_Median_Age",
    "Total_Rooms",
    "Total_Bedrooms",
    "Population",
    "Households",
    "Median_Income",
    TARGET_COLUMN,
    CATEGORICAL_COLUMN,
];

/// Shape information displayed after loading
#[derive(Debug, Clone, Copy)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// Columns are renamed positionally to [`CANONICAL_COLUMNS`] and a `row_id`
/// column (0..n) is prepended so later stages can keep features and target aligned.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PipelineError::data_unavailable(path, "file not found").into());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let read = match extension.as_str() {
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).and_then(|lf| lf.collect()),
        _ => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(schema_length)
            .finish()
            .and_then(|lf| lf.collect()),
    };

    let df = read.map_err(|e| PipelineError::data_unavailable(path, e.to_string()))?;

    canonicalize(df).with_context(|| format!("Unexpected layout in {}", path.display()))
}

/// Rename columns positionally and prepend the row identity column
pub fn canonicalize(df: DataFrame) -> Result<DataFrame> {
    if df.width() != CANONICAL_COLUMNS.len() {
        return Err(PipelineError::SchemaMismatch(format!(
            "expected {} columns, found {}",
            CANONICAL_COLUMNS.len(),
            df.width()
        ))
        .into());
    }

    let row_ids: Vec<u32> = (0..df.height() as u32).collect();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width() + 1);
    columns.push(Column::new(ROW_ID.into(), row_ids));

    for (column, name) in df.get_columns().iter().zip(CANONICAL_COLUMNS) {
        let mut renamed = column.clone();
        renamed.rename(name.into());
        columns.push(renamed);
    }

    Ok(DataFrame::new(columns)?)
}

/// Extract the target table (`row_id`, target) from a canonical raw frame.
///
/// The target must be numeric and complete.
pub fn extract_target(raw: &DataFrame) -> Result<DataFrame> {
    let target = raw
        .column(TARGET_COLUMN)
        .with_context(|| format!("Target column '{}' not found", TARGET_COLUMN))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Target column '{}' is not numeric", TARGET_COLUMN))?;

    let missing = target.null_count();
    if missing > 0 {
        return Err(PipelineError::SchemaMismatch(format!(
            "target column '{}' has {} missing value(s)",
            TARGET_COLUMN, missing
        ))
        .into());
    }

    let row_id = raw.column(ROW_ID)?.clone();
    Ok(DataFrame::new(vec![row_id, target])?)
}

/// Drop the target from a canonical raw frame, leaving `row_id` and the attributes
pub fn raw_features(raw: &DataFrame) -> DataFrame {
    raw.drop_many([TARGET_COLUMN])
}

/// Collect basic statistics about a loaded dataset (row id column excluded)
pub fn dataset_stats(df: &DataFrame) -> DatasetStats {
    let columns = df
        .get_column_names()
        .iter()
        .filter(|name| name.as_str() != ROW_ID)
        .count();

    DatasetStats {
        rows: df.height(),
        columns,
        memory_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
    }
}
