//! transeval CLI

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use transeval::{
    config::Config,
    providers::default_providers,
    reporting::print_console_report,
    runner::{Evaluator, Pipeline, RunOptions},
};

#[derive(Parser)]
#[command(name = "transeval")]
#[command(about = "BLEU, chrF and TER for several translation systems, cross-checked by two providers")]
#[command(version)]
struct Cli {
    /// Input table with a `reference` column (CSV, or JSON records)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Summary CSV output path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also export the summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("transeval=debug,info")
    } else {
        EnvFilter::new("transeval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    let mut options = RunOptions::new(cli.input.unwrap_or(config.paths.input))
        .with_output(cli.output.unwrap_or(config.paths.output))
        .with_agreement_tolerance(config.report.agreement_tolerance);
    if let Some(json) = cli.json.or(config.paths.json) {
        options = options.with_json(json);
    }

    let pipeline = Pipeline::new(Evaluator::new(default_providers()));
    match pipeline.run(&options) {
        Ok(summary) => print_console_report(&summary, options.agreement_tolerance),
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}
