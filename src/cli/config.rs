//! Resolved run configuration shared by every stage

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::args::Cli;
use crate::model::TrainerConfig;
use crate::pipeline::PipelineError;

/// File name of the fitted preprocessor inside the processed directory
pub const PREPROCESSOR_FILE: &str = "preprocessor.json";

/// File name of the ranked comparison export inside the output directory
pub const COMPARISON_FILE: &str = "model_comparison.json";

/// Paths and settings passed explicitly to each stage
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub processed_dir: PathBuf,
    pub model_dir: PathBuf,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub cv_folds: usize,
    pub infer_schema_length: usize,
}

impl PipelineConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            input: cli.input.clone(),
            processed_dir: cli.processed_dir.clone(),
            model_dir: cli.model_dir.clone(),
            output_dir: cli.output_dir.clone(),
            seed: cli.seed,
            cv_folds: cli.cv_folds,
            infer_schema_length: cli.infer_schema_length,
        }
    }

    /// Rooted under `base`, keeping the default relative layout
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            input: base.join("data").join("housing.csv"),
            processed_dir: base.join("data").join("processed_data"),
            model_dir: base.join("models"),
            output_dir: base.join("outputs"),
            seed: crate::pipeline::DEFAULT_SEED,
            cv_folds: 5,
            infer_schema_length: 10000,
        }
    }

    /// Create the processed, model and output directories
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.processed_dir, &self.model_dir, &self.output_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::io_failure(dir, e))?;
        }
        Ok(())
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        let mut config = TrainerConfig::default().with_seed(self.seed);
        config.cv_folds = self.cv_folds;
        config
    }

    pub fn preprocessor_path(&self) -> PathBuf {
        self.processed_dir.join(PREPROCESSOR_FILE)
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.output_dir.join(COMPARISON_FILE)
    }
}
