use pardot_core::PardotApi;
use serde_json::Value;

use crate::cli::{ObjectKind, ReadArgs};
use crate::error::CliError;

pub async fn run(args: &ReadArgs, api: &mut PardotApi) -> Result<Option<Value>, CliError> {
    let result = match args.object {
        ObjectKind::Campaign => api.campaigns().read(args.id).await?,
        ObjectKind::Prospect => api.prospects().read(args.id).await?,
        ObjectKind::ProspectAccount => api.prospect_accounts().read(args.id).await?,
    };
    Ok(result)
}
