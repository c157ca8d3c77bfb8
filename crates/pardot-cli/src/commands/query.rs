use pardot_core::PardotApi;
use serde_json::{Map, Value};

use crate::cli::{ObjectKind, QueryArgs};
use crate::error::CliError;

pub async fn run(args: &QueryArgs, api: &mut PardotApi) -> Result<Option<Value>, CliError> {
    let params = parse_params(&args.params)?;
    let result = match args.object {
        ObjectKind::Campaign => api.campaigns().query(params).await?,
        ObjectKind::Prospect => api.prospects().query(params).await?,
        ObjectKind::ProspectAccount => api.prospect_accounts().query(params).await?,
    };
    Ok(result)
}

fn parse_params(raw: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut params = Map::new();
    for pair in raw {
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| CliError::Usage(format!("expected key=value, got `{pair}`")))?;

        let value = if value.starts_with('[') {
            serde_json::from_str(value)?
        } else {
            Value::String(value.to_owned())
        };
        params.insert(key.to_owned(), value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn values_are_text_unless_they_look_like_arrays() {
        let params = parse_params(&[
            String::from("limit=20"),
            String::from("fields=[\"id\",\"email\"]"),
            String::from("name=a=b"),
        ])
        .expect("valid parameters");

        assert_eq!(params["limit"], json!("20"));
        assert_eq!(params["fields"], json!(["id", "email"]));
        assert_eq!(params["name"], json!("a=b"));
    }

    #[test]
    fn pairs_without_key_are_usage_errors() {
        let error = parse_params(&[String::from("=20")]).expect_err("must fail");
        assert!(matches!(error, CliError::Usage(_)));

        let error = parse_params(&[String::from("limit")]).expect_err("must fail");
        assert_eq!(error.exit_code(), 2);
    }
}
