//! Tests for dataset loading and the canonical schema

use polars::prelude::*;
use pricefit::pipeline::{
    dataset_stats, extract_target, load_dataset, raw_features, PipelineError, CANONICAL_COLUMNS,
    ROW_ID, TARGET_COLUMN,
};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_renames_positionally() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = common::write_housing_csv(temp_dir.path(), 50, 1);

    let df = load_dataset(&csv_path, 100).unwrap();

    let mut expected = vec![ROW_ID];
    expected.extend(CANONICAL_COLUMNS);
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);
    assert_eq!(df.height(), 50);
}

#[test]
fn test_row_ids_are_sequential() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = common::write_housing_csv(temp_dir.path(), 20, 2);

    let df = load_dataset(&csv_path, 100).unwrap();
    let ids = pricefit::pipeline::row_ids(&df).unwrap();

    assert_eq!(ids, (0..20).collect::<Vec<u32>>());
}

#[test]
fn test_load_parquet_file() {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("housing.parquet");

    let mut df = common::create_housing_dataframe(30, 3);
    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let loaded = load_dataset(&parquet_path, 100).unwrap();
    assert_eq!(loaded.height(), 30);
    assert!(loaded.column(TARGET_COLUMN).is_ok());
}

#[test]
fn test_missing_file_is_data_unavailable() {
    let err = load_dataset(std::path::Path::new("does/not/exist.csv"), 100).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::DataUnavailable { .. })
    ));
}

#[test]
fn test_wrong_column_count_is_schema_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let df = df! {
        "a" => [1.0f64, 2.0],
        "b" => [3.0f64, 4.0],
    }
    .unwrap();
    let path = common::write_csv(&df, temp_dir.path(), "narrow.csv");

    let err = load_dataset(&path, 100).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::SchemaMismatch(_))
    ));
}

#[test]
fn test_extract_target_and_features() {
    let raw = common::create_canonical_dataframe(40, 4);

    let target = extract_target(&raw).unwrap();
    assert_eq!(target.width(), 2);
    assert_eq!(target.height(), 40);
    assert_eq!(target.column(TARGET_COLUMN).unwrap().dtype(), &DataType::Float64);

    let features = raw_features(&raw);
    assert!(features.column(TARGET_COLUMN).is_err());
    assert_eq!(features.width(), 10);
}

#[test]
fn test_extract_target_rejects_missing_values() {
    let mut raw = common::create_canonical_dataframe(5, 5);
    let target: Vec<Option<f64>> = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
    raw.with_column(Column::new(TARGET_COLUMN.into(), target)).unwrap();

    let err = extract_target(&raw).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::SchemaMismatch(_))
    ));
}

#[test]
fn test_dataset_stats_excludes_row_id() {
    let raw = common::create_canonical_dataframe(10, 6);
    let stats = dataset_stats(&raw);

    assert_eq!(stats.rows, 10);
    assert_eq!(stats.columns, 10);
    assert!(stats.memory_mb >= 0.0);
}
