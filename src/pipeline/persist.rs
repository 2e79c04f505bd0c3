//! Parquet persistence of the six split tables

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::{polars_write_failure, PipelineError};
use super::frame::LabeledFrame;
use super::split::DataSplits;

/// Artifact stem for a feature table, e.g. `X_train`
pub fn features_stem(partition: &str) -> String {
    format!("X_{}", partition)
}

/// Artifact stem for a target table, e.g. `y_train`
pub fn target_stem(partition: &str) -> String {
    format!("y_{}", partition)
}

/// Path of a split artifact inside `dir`
pub fn artifact_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}.parquet", stem))
}

/// Write a table as Parquet; failures surface as `IoFailure`
pub fn write_parquet(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| PipelineError::io_failure(path, e))?;

    let mut df = df.clone();
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| polars_write_failure(path, e))?;

    Ok(())
}

/// Read a Parquet table; a missing or unreadable file is `DataUnavailable`
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| PipelineError::data_unavailable(path, e.to_string()))?;

    ParquetReader::new(file)
        .finish()
        .map_err(|e| PipelineError::data_unavailable(path, e.to_string()).into())
}

/// Write `X_{train,val,test}` and `y_{train,val,test}` into `dir`.
///
/// Returns the written paths in write order.
pub fn save_splits(splits: &DataSplits, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(6);

    for (partition, frame) in splits.partitions() {
        let path = artifact_path(dir, &features_stem(partition));
        write_parquet(frame.features(), &path)?;
        written.push(path);

        let path = artifact_path(dir, &target_stem(partition));
        write_parquet(frame.target(), &path)?;
        written.push(path);
    }

    Ok(written)
}

/// Load one (X, y) pair and check the two tables are row-aligned
pub fn load_partition(dir: &Path, partition: &str) -> Result<LabeledFrame> {
    let features = read_parquet(&artifact_path(dir, &features_stem(partition)))?;
    let target = read_parquet(&artifact_path(dir, &target_stem(partition)))?;

    LabeledFrame::new(features, target)
        .with_context(|| format!("Split '{}' in {} is inconsistent", partition, dir.display()))
}

/// Load the six split tables written by [`save_splits`]
pub fn load_splits(dir: &Path) -> Result<DataSplits> {
    let train = load_partition(dir, "train")?;
    let validation = load_partition(dir, "val")?;
    let test = load_partition(dir, "test")?;

    if validation.feature_names() != train.feature_names() || test.feature_names() != train.feature_names() {
        return Err(PipelineError::SchemaMismatch(
            "train, validation and test feature tables have different columns".to_string(),
        )
        .into());
    }

    Ok(DataSplits {
        train,
        validation,
        test,
    })
}
