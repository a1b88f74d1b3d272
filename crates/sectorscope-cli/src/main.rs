mod cli;
mod commands;
mod error;
mod export;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::Cli;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "sectorscope=warn";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let dashboard = commands::Dashboard::from_config(&cli.fetch_config());
    let result = commands::run(cli, &dashboard).await?;
    output::render(&result, cli.format, cli.pretty)
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        1 => EnvFilter::new("sectorscope=info"),
        _ => EnvFilter::new("sectorscope=debug"),
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install log subscriber: {error}");
    }
}
