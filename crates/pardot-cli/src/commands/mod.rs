mod account;
mod batch;
mod query;
mod read;

use pardot_core::{ApiConfig, ConfigError, Credentials, ErrorMode, PardotApi};
use secrecy::SecretString;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Option<Value>, CliError> {
    let mut api = build_client(cli)?;
    tracing::debug!(?api, "client configured");

    match &cli.command {
        Command::Account => account::run(&mut api).await,
        Command::Read(args) => read::run(args, &mut api).await,
        Command::Query(args) => query::run(args, &mut api).await,
        Command::Batch(args) => batch::run(args, &mut api).await,
    }
}

fn build_client(cli: &Cli) -> Result<PardotApi, CliError> {
    let mut config = ApiConfig::default()
        .with_host(&cli.host)
        .with_version(&cli.api_version)
        .with_output(cli.output)
        .with_error_mode(ErrorMode::from_debug_flag(cli.debug));
    if let Some(token_url) = &cli.token_url {
        config = config.with_token_url(token_url);
    }

    Ok(PardotApi::new(&cli.auth_type, credentials(cli)?, config)?)
}

fn credentials(cli: &Cli) -> Result<Credentials, ConfigError> {
    let email = cli.email.clone().ok_or(ConfigError::MissingEnv {
        name: "PARDOT_EMAIL",
    })?;
    let password = cli.password.clone().ok_or(ConfigError::MissingEnv {
        name: "PARDOT_PASSWORD",
    })?;

    let mut credentials = Credentials::new(email, password);
    credentials.user_key = cli.user_key.clone();
    credentials.security_token = cli.security_token.clone().map(SecretString::new);
    credentials.business_unit_id = cli.business_unit_id.clone();
    credentials.consumer_key = cli.consumer_key.clone();
    credentials.consumer_secret = cli.consumer_secret.clone().map(SecretString::new);
    Ok(credentials)
}
