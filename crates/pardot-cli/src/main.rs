mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.debug);
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(error) => {
            if let Some(error) = dotenv_failure(error) {
                tracing::warn!(%error, "could not load .env file");
            }
        }
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let result = commands::run(cli).await?;
    output::render(result.as_ref(), cli.pretty)
}

/// A missing `.env` is expected; anything else (unreadable or malformed) is reported.
fn dotenv_failure(error: dotenvy::Error) -> Option<dotenvy::Error> {
    if error.not_found() {
        None
    } else {
        Some(error)
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides the level.
fn init_tracing(debug: bool) {
    let default_level = if debug { "pardot_core=debug,info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
