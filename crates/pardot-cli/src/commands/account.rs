use pardot_core::PardotApi;
use serde_json::Value;

use crate::error::CliError;

pub async fn run(api: &mut PardotApi) -> Result<Option<Value>, CliError> {
    Ok(api.account().read().await?)
}
