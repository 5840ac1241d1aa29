use std::process::ExitCode;

use clap::Parser;
use kaikanakku::bootstrap::{init_tracing_subscriber, load_runtime_config};
use kaikanakku::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_runtime_config(cli.config.as_deref(), cli.data_dir.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing_subscriber(&config.logs_dir, cli.verbose) {
        eprintln!("Failed to initialize tracing: {e}");
    }
    tracing::info!(data_dir = %config.data_dir.display(), "kaikanakku starting");

    match kaikanakku::run_with_config(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
