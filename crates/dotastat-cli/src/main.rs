mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use std::process::ExitCode;

use dotastat_core::{Dispatcher, DispatcherConfig};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            output::render_error(&error, cli.json);
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = DispatcherConfig::from_env()?;
    info!(
        base_url = %config.base_url,
        api_key_present = config.api_key.is_some(),
        "starting dotastat"
    );

    let dispatcher = Dispatcher::new(config);
    let janitor = dispatcher.spawn_janitor();

    if !cli.no_health_check {
        match dispatcher.health_check().await {
            Ok(_) => info!("OpenDota API connection successful"),
            Err(error) => warn!(kind = %error.kind(), "OpenDota API status check failed: {error}"),
        }
    }

    let result = commands::run(cli, &dispatcher).await;
    janitor.shutdown().await;

    output::render(&result?)
}
