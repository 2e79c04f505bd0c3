//! Tests for writing and reading the split tables

use pricefit::pipeline::{load_partition, load_splits, save_splits, PipelineError};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_save_writes_six_named_tables() {
    let temp_dir = TempDir::new().unwrap();
    let splits = common::create_linear_splits(120);

    let written = save_splits(&splits, temp_dir.path()).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "X_train.parquet",
            "y_train.parquet",
            "X_val.parquet",
            "y_val.parquet",
            "X_test.parquet",
            "y_test.parquet"
        ]
    );
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn test_round_trip_preserves_values_names_and_order() {
    let temp_dir = TempDir::new().unwrap();
    let splits = common::create_linear_splits(150);

    save_splits(&splits, temp_dir.path()).unwrap();
    let loaded = load_splits(temp_dir.path()).unwrap();

    for ((name, original), (_, reloaded)) in splits.partitions().iter().zip(loaded.partitions().iter()) {
        assert!(
            original.features().equals(reloaded.features()),
            "{} features differ",
            name
        );
        assert!(original.target().equals(reloaded.target()), "{} target differs", name);
    }
}

#[test]
fn test_missing_table_is_data_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let splits = common::create_linear_splits(100);
    save_splits(&splits, temp_dir.path()).unwrap();
    std::fs::remove_file(temp_dir.path().join("y_val.parquet")).unwrap();

    let err = load_partition(temp_dir.path(), "val").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::DataUnavailable { .. })
    ));
    assert!(load_splits(temp_dir.path()).is_err());
}

#[test]
fn test_write_into_missing_directory_is_io_failure() {
    let temp_dir = TempDir::new().unwrap();
    let splits = common::create_linear_splits(100);

    let err = save_splits(&splits, &temp_dir.path().join("absent")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::IoFailure { .. })
    ));
}
