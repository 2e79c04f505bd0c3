//! CLI module - argument parsing and the stage runners

pub mod args;
pub mod config;
pub mod preprocess;
pub mod report;
pub mod train;

pub use args::{Cli, Commands, ModelChoice};
pub use config::PipelineConfig;
pub use preprocess::{run_preprocess, PreprocessOutcome};
pub use report::run_report;
pub use train::run_train;
