use serde_json::Value;

use crate::error::CliError;

/// Prints the decoded payload, or `null` when the request produced no result.
pub fn render(result: Option<&Value>, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{payload}");
    Ok(())
}
