use std::path::Path;

use pardot_core::PardotApi;
use serde_json::Value;

use crate::cli::{BatchArgs, BatchOperation};
use crate::error::CliError;

pub async fn run(args: &BatchArgs, api: &mut PardotApi) -> Result<Option<Value>, CliError> {
    let records = load_records(&args.file)?;
    tracing::info!(count = records.len(), operation = ?args.operation, "submitting prospect batch");

    let mut prospects = api.prospects();
    let result = match args.operation {
        BatchOperation::Create => prospects.batch_create(&records).await?,
        BatchOperation::Update => prospects.batch_update(&records).await?,
        BatchOperation::Upsert => prospects.batch_upsert(&records).await?,
    };
    Ok(result)
}

fn load_records(path: &Path) -> Result<Vec<Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
