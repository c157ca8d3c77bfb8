//! Response decoding and the API's success contract.

use std::fmt::Debug;

use serde_json::Value;

use crate::ApiError;

/// Decoding strategy, chosen when the client is constructed.
pub trait Formatter: Debug + Send + Sync {
    /// Value sent in the `format` control field.
    fn format(&self) -> &'static str;

    /// Decodes `body` and fails on an API-level error. `result_field` is the payload key
    /// the caller asked for.
    fn decode(&self, body: &str, result_field: &str) -> Result<Value, ApiError>;
}

/// JSON response formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn decode(&self, body: &str, result_field: &str) -> Result<Value, ApiError> {
        let data = match serde_json::from_str::<Value>(body) {
            Ok(Value::Null) | Err(_) => return Ok(Value::Bool(true)),
            Ok(data) => data,
        };

        if let Some(err) = data.get("err").filter(|value| !is_empty(value)) {
            return Err(ApiError::Single(text_of(err)));
        }
        if let Some(errors) = data.get("errors").filter(|value| !is_empty(value)) {
            return Err(ApiError::Batch(messages_of(errors)));
        }

        // Batch responses carry no payload, only the status attribute.
        let has_result = data.get(result_field).is_some_and(|value| !is_empty(value));
        if has_result && status_of(&data) != Some("ok") {
            return Err(ApiError::MissingField(result_field.to_owned()));
        }

        Ok(data)
    }
}

/// Reads `@attributes.stat`.
pub fn status_of(data: &Value) -> Option<&str> {
    data.get("@attributes")
        .and_then(|attributes| attributes.get("stat"))
        .and_then(Value::as_str)
}

/// Emptiness as the API treats it: null, false, 0, "", "0" and empty collections.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Keyed errors follow the response order, which matches the submitted records.
fn messages_of(errors: &Value) -> Vec<String> {
    match errors {
        Value::Array(items) => items.iter().map(text_of).collect(),
        Value::Object(map) => map.values().map(text_of).collect(),
        other => vec![text_of(other)],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_error_is_raised_with_message() {
        let error = JsonFormatter
            .decode(r#"{"err":"bad field"}"#, "result")
            .expect_err("must fail");
        assert!(error.to_string().contains("bad field"));
        assert_eq!(error, ApiError::Single(String::from("bad field")));
    }

    #[test]
    fn error_list_is_joined() {
        let error = JsonFormatter
            .decode(r#"{"errors":["a","b"]}"#, "result")
            .expect_err("must fail");
        assert_eq!(error.to_string(), "Pardot API error(s): a. b");
    }

    #[test]
    fn keyed_batch_errors_are_joined_in_key_order() {
        let error = JsonFormatter
            .decode(
                r#"{"@attributes":{"stat":"fail"},"errors":{"0":"Invalid email","2":"Duplicate"}}"#,
                "prospect",
            )
            .expect_err("must fail");
        assert_eq!(
            error.to_string(),
            "Pardot API error(s): Invalid email. Duplicate"
        );
    }

    #[test]
    fn keyed_batch_errors_keep_response_order_past_ten_records() {
        let body = (0..=10)
            .map(|index| format!(r#""{index}":"e{index}""#))
            .collect::<Vec<_>>()
            .join(",");
        let error = JsonFormatter
            .decode(&format!(r#"{{"errors":{{{body}}}}}"#), "prospect")
            .expect_err("must fail");

        assert_eq!(
            error.to_string(),
            "Pardot API error(s): e0. e1. e2. e3. e4. e5. e6. e7. e8. e9. e10"
        );
    }

    #[test]
    fn ok_status_returns_decoded_payload() {
        let data = JsonFormatter
            .decode(r#"{"@attributes":{"stat":"ok"},"result":{"id":1}}"#, "result")
            .expect("ok response");
        assert_eq!(data["result"], json!({"id": 1}));
    }

    #[test]
    fn result_without_ok_status_is_missing_field() {
        let error = JsonFormatter
            .decode(r#"{"@attributes":{"stat":"fail"},"result":{"id":1}}"#, "result")
            .expect_err("must fail");
        assert_eq!(error, ApiError::MissingField(String::from("result")));
        assert_eq!(
            error.to_string(),
            "Pardot API error: cannot find result in response"
        );
    }

    #[test]
    fn empty_or_unparsable_body_is_true() {
        assert_eq!(JsonFormatter.decode("", "result"), Ok(Value::Bool(true)));
        assert_eq!(JsonFormatter.decode("<html>", "result"), Ok(Value::Bool(true)));
        assert_eq!(JsonFormatter.decode("null", "result"), Ok(Value::Bool(true)));
    }

    #[test]
    fn empty_error_fields_are_ignored() {
        let data = JsonFormatter
            .decode(r#"{"@attributes":{"stat":"ok"},"err":"","errors":[]}"#, "prospect")
            .expect("empty errors are not failures");
        assert_eq!(status_of(&data), Some("ok"));
    }

    #[test]
    fn batch_response_without_payload_passes() {
        let data = JsonFormatter
            .decode(r#"{"@attributes":{"stat":"ok"}}"#, "prospect")
            .expect("ok response");
        assert!(data.get("prospect").is_none());
    }
}
