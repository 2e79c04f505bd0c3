//! Command-line argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::ModelKind;

/// pricefit - Prepare housing data, train regressors and compare them
#[derive(Parser, Debug)]
#[command(name = "pricefit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline stage to run. Defaults to `run` (every stage in order).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input dataset (CSV or Parquet) with the ten housing columns in fixed order
    #[arg(short, long, global = true, default_value = "data/housing.csv")]
    pub input: PathBuf,

    /// Directory for the six split tables and the fitted preprocessor
    #[arg(long, global = true, default_value = "data/processed_data")]
    pub processed_dir: PathBuf,

    /// Directory for fitted models and their result records
    #[arg(long, global = true, default_value = "models")]
    pub model_dir: PathBuf,

    /// Directory for comparison charts and the ranked comparison export
    #[arg(long, global = true, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Seed for the train/validation/test split and the random forest
    #[arg(long, global = true, default_value = "42")]
    pub seed: u64,

    /// Number of cross-validation folds on the training partition
    #[arg(long, global = true, default_value = "5", value_parser = validate_cv_folds)]
    pub cv_folds: usize,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load, clean, encode, filter, select and split the dataset
    Preprocess,

    /// Train one or all models on the persisted splits
    Train {
        /// Which model to train
        #[arg(short, long, value_enum, default_value = "all")]
        model: ModelChoice,
    },

    /// Rank the trained models and render comparison charts
    Report,

    /// Run preprocess, train (all models) and report in order
    Run,
}

/// Model selector for the `train` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    Lr,
    Rf,
    Gbr,
    All,
}

impl ModelChoice {
    pub fn kinds(&self) -> Vec<ModelKind> {
        match self {
            ModelChoice::Lr => vec![ModelKind::LinearRegression],
            ModelChoice::Rf => vec![ModelKind::RandomForest],
            ModelChoice::Gbr => vec![ModelKind::GradientBoosting],
            ModelChoice::All => ModelKind::ALL.to_vec(),
        }
    }
}

impl Cli {
    /// The requested stage, `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

/// Validator for cv_folds parameter
fn validate_cv_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid fold count", s))?;

    if value < 2 {
        Err(format!("cv_folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}
