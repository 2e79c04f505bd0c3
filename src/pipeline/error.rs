//! Error taxonomy for the pipeline stages.
//!
//! Stage functions return `anyhow::Result` with context attached, but the
//! conditions callers may want to branch on are raised as `PipelineError`
//! so they stay reachable through `anyhow::Error::downcast_ref`.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised by the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input file is missing or cannot be read.
    #[error("Data unavailable: '{}' ({reason})", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// Every feature fell below the correlation threshold.
    #[error("No features remain after correlation filtering (threshold {threshold}, {candidates} candidate(s))")]
    NoFeaturesRemain { threshold: f64, candidates: usize },

    /// Writing an artifact failed.
    #[error("Failed to write '{}': {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data does not have the shape the pipeline expects.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Arguments that make a computation meaningless.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PipelineError {
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}

/// Wrap a polars error raised while writing a file as an `IoFailure`.
pub(crate) fn polars_write_failure(path: &std::path::Path, err: polars::prelude::PolarsError) -> PipelineError {
    PipelineError::io_failure(path, std::io::Error::other(err.to_string()))
}
