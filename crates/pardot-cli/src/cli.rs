//! CLI argument definitions for the Pardot client.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `account` | Read the authenticated account |
//! | `read` | Read one record by id |
//! | `query` | Query records with validated `key=value` parameters |
//! | `batch` | Create, update or upsert prospects from a JSON array file |
//!
//! Every global option can also be supplied through its `PARDOT_*` environment
//! variable or a `.env` file in the working directory.
//!
//! ```bash
//! pardot --email ops@example.com --password secret --user-key key account
//! pardot query prospect assigned=true sort_by=created_at limit=20 --pretty
//! pardot --auth-type OAUTH batch upsert prospects.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pardot_core::config::{DEFAULT_API_VERSION, DEFAULT_HOST};
use pardot_core::OutputMode;

#[derive(Debug, Parser)]
#[command(
    name = "pardot",
    author,
    version,
    about = "Pardot marketing automation API client"
)]
pub struct Cli {
    /// Authentication flow: PARDOT (api key) or OAUTH (Salesforce).
    #[arg(long, global = true, env = "PARDOT_AUTH_TYPE", default_value = "PARDOT")]
    pub auth_type: String,

    #[arg(long, global = true, env = "PARDOT_EMAIL")]
    pub email: Option<String>,

    #[arg(long, global = true, env = "PARDOT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, global = true, env = "PARDOT_USER_KEY", hide_env_values = true)]
    pub user_key: Option<String>,

    #[arg(long, global = true, env = "PARDOT_SECURITY_TOKEN", hide_env_values = true)]
    pub security_token: Option<String>,

    /// 18-character Salesforce business unit id (OAUTH only).
    #[arg(long, global = true, env = "PARDOT_BUSINESS_UNIT_ID")]
    pub business_unit_id: Option<String>,

    #[arg(long, global = true, env = "PARDOT_CONSUMER_KEY")]
    pub consumer_key: Option<String>,

    #[arg(long, global = true, env = "PARDOT_CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: Option<String>,

    #[arg(long, global = true, env = "PARDOT_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, global = true, env = "PARDOT_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Salesforce OAuth token endpoint.
    #[arg(long, global = true, env = "PARDOT_TOKEN_URL")]
    pub token_url: Option<String>,

    /// Response detail level: full, simple, mobile or bulk.
    #[arg(long, global = true, env = "PARDOT_OUTPUT", default_value = "full")]
    pub output: OutputMode,

    /// Surface authentication and transport failures instead of printing `null`.
    #[arg(long, global = true, env = "PARDOT_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the authenticated user's account.
    Account,
    /// Read one record by id.
    Read(ReadArgs),
    /// Query records of an object type.
    Query(QueryArgs),
    /// Run a batch operation over prospects.
    Batch(BatchArgs),
}

/// Object types reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectKind {
    Campaign,
    Prospect,
    ProspectAccount,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    #[arg(value_enum)]
    pub object: ObjectKind,

    pub id: u64,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(value_enum)]
    pub object: ObjectKind,

    /// Query parameters as `key=value`. Values starting with `[` are parsed as JSON
    /// arrays, everything else is sent as text.
    pub params: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BatchOperation {
    Create,
    Update,
    Upsert,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[arg(value_enum)]
    pub operation: BatchOperation,

    /// JSON file holding an array of prospect records.
    pub file: PathBuf,
}
