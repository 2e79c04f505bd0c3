//! pricefit: housing price regression CLI
//!
//! Runs the preprocessing, training and reporting stages, separately or in order.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use pricefit::cli::{run_preprocess, run_report, run_train, Cli, Commands, PipelineConfig};
use pricefit::model::ModelKind;
use pricefit::utils::{print_banner, print_completion, print_config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PipelineConfig::from_cli(&cli);

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &config.input,
        &config.processed_dir,
        &config.model_dir,
        &config.output_dir,
        config.seed,
        config.cv_folds,
    );

    config.ensure_dirs()?;
    let start = Instant::now();

    match cli.command() {
        Commands::Preprocess => {
            run_preprocess(&config)?;
            print_completion("Preprocessing complete!");
        }
        Commands::Train { model } => {
            run_train(&config, &model.kinds())?;
            print_completion("Training complete!");
        }
        Commands::Report => {
            run_report(&config)?;
            print_completion("Report complete!");
        }
        Commands::Run => {
            run_preprocess(&config)?;
            run_train(&config, &ModelKind::ALL)?;
            run_report(&config)?;
            print_completion("Pipeline complete!");
        }
    }

    println!(
        "    {}",
        style(format!("Total time: {:.2}s", start.elapsed().as_secs_f64())).dim()
    );
    println!();

    Ok(())
}
