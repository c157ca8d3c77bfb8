use thiserror::Error;

use crate::http_client::HttpError;

/// Parameter validation failures raised before a request leaves the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' is not accepted by this query")]
    UnknownField { field: String },
    #[error("field '{field}' failed {rule} validation")]
    InvalidValue { field: String, rule: &'static str },
}

/// Client configuration errors. These surface immediately at construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{value} is an unsupported authentication type")]
    UnsupportedAuthType { value: String },
    #[error("{auth_type} authentication requires '{field}'")]
    MissingCredential {
        auth_type: &'static str,
        field: &'static str,
    },
    #[error("business unit id must be 18 alphanumeric characters: '{value}'")]
    InvalidBusinessUnitId { value: String },
    #[error("invalid output mode '{value}', expected one of full, simple, mobile, bulk")]
    InvalidOutputMode { value: String },
    #[error("environment variable {name} is not set")]
    MissingEnv { name: &'static str },
}

/// Authentication attempt failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Transport(HttpError),
    #[error("login rejected: {message}")]
    Rejected { message: String },
    #[error("login response did not contain an api key")]
    MissingApiKey,
    #[error("{0}")]
    TokenExchange(String),
}

/// Transport failures of a query call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] HttpError),
    #[error("{}", status_message(.status, .err_code, .message))]
    Status {
        status: u16,
        err_code: Option<u32>,
        message: String,
    },
}

fn status_message(status: &u16, err_code: &Option<u32>, message: &str) -> String {
    match err_code {
        Some(code) => format!("Pardot API returned HTTP {status} (err_code {code}): {message}"),
        None => format!("Pardot API returned HTTP {status}: {message}"),
    }
}

impl TransportError {
    /// Pardot's numeric error code, when the failing response carried one.
    pub const fn err_code(&self) -> Option<u32> {
        match self {
            Self::Status { err_code, .. } => *err_code,
            Self::Http(_) => None,
        }
    }
}

/// Errors reported by the API inside an otherwise successful response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Pardot API error: {0}")]
    Single(String),
    #[error("Pardot API error(s): {}", .0.join(". "))]
    Batch(Vec<String>),
    #[error("Pardot API error: cannot find {0} in response")]
    MissingField(String),
}

/// Query precondition violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    #[error("query object must be set before request")]
    MissingObject,
    #[error("query operator must be set before request")]
    MissingOperator,
}

/// Top-level error type for client operations.
#[derive(Debug, Error)]
pub enum PardotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_errors_join_with_period() {
        let error = ApiError::Batch(vec![String::from("a"), String::from("b")]);
        assert_eq!(error.to_string(), "Pardot API error(s): a. b");
    }

    #[test]
    fn status_error_mentions_err_code() {
        let error = TransportError::Status {
            status: 400,
            err_code: Some(15),
            message: String::from("Login failed"),
        };
        assert_eq!(error.err_code(), Some(15));
        assert!(error.to_string().contains("err_code 15"));
    }

    #[test]
    fn unsupported_auth_type_names_the_value() {
        let error = ConfigError::UnsupportedAuthType {
            value: String::from("SAML"),
        };
        assert_eq!(error.to_string(), "SAML is an unsupported authentication type");
    }
}
