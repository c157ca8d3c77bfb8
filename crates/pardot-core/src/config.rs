use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, PardotError};

pub const DEFAULT_HOST: &str = "pi.pardot.com";
pub const DEFAULT_API_VERSION: &str = "4";
pub const DEFAULT_TOKEN_URL: &str = "https://login.salesforce.com/services/oauth2/token";

/// How gated failures (authentication and transport) reach the caller.
///
/// `Silent` absorbs them and the request yields no result. `Debug` logs them at
/// error level and returns them. API-level, validation and precondition errors are
/// returned in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    #[default]
    Silent,
    Debug,
}

impl ErrorMode {
    pub const fn from_debug_flag(debug: bool) -> Self {
        if debug {
            Self::Debug
        } else {
            Self::Silent
        }
    }

    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    /// Applies the mode to a gated failure: `Err` in debug mode, `Ok(())` otherwise.
    pub fn gate(self, error: impl Into<PardotError>) -> Result<(), PardotError> {
        let error = error.into();
        match self {
            Self::Debug => {
                tracing::error!(%error, "pardot request failed");
                Err(error)
            }
            Self::Silent => {
                tracing::debug!(%error, "absorbing pardot failure in silent mode");
                Ok(())
            }
        }
    }
}

/// Level of detail requested through the `output` control field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Full,
    Simple,
    Mobile,
    Bulk,
}

impl OutputMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Simple => "simple",
            Self::Mobile => "mobile",
            Self::Bulk => "bulk",
        }
    }
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "full" => Ok(Self::Full),
            "simple" => Ok(Self::Simple),
            "mobile" => Ok(Self::Mobile),
            "bulk" => Ok(Self::Bulk),
            other => Err(ConfigError::InvalidOutputMode {
                value: other.to_owned(),
            }),
        }
    }
}

/// Client-wide settings shared by every query issued through one `PardotApi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub version: String,
    pub output: OutputMode,
    pub error_mode: ErrorMode,
    pub token_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            version: String::from(DEFAULT_API_VERSION),
            output: OutputMode::default(),
            error_mode: ErrorMode::default(),
            token_url: String::from(DEFAULT_TOKEN_URL),
        }
    }
}

impl ApiConfig {
    /// Reads `PARDOT_HOST`, `PARDOT_API_VERSION`, `PARDOT_OUTPUT`, `PARDOT_DEBUG` and
    /// `PARDOT_TOKEN_URL`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let output = match std::env::var("PARDOT_OUTPUT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.output,
        };
        let debug = std::env::var("PARDOT_DEBUG")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host: std::env::var("PARDOT_HOST").unwrap_or(defaults.host),
            version: std::env::var("PARDOT_API_VERSION").unwrap_or(defaults.version),
            output,
            error_mode: ErrorMode::from_debug_flag(debug),
            token_url: std::env::var("PARDOT_TOKEN_URL").unwrap_or(defaults.token_url),
        })
    }

    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn login_url(&self) -> String {
        format!("https://{}/api/login/version/{}", self.host, self.version)
    }

    pub fn endpoint(&self, object: &str, operator: &str) -> String {
        format!(
            "https://{}/api/{}/version/{}/do/{}",
            self.host, object, self.version, operator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_substitutes_object_version_and_operator() {
        let config = ApiConfig::default();
        assert_eq!(
            config.endpoint("account", "read"),
            "https://pi.pardot.com/api/account/version/4/do/read"
        );
    }

    #[test]
    fn login_url_follows_configured_version() {
        let config = ApiConfig::default().with_version("3");
        assert_eq!(config.login_url(), "https://pi.pardot.com/api/login/version/3");
    }

    #[test]
    fn output_mode_parses_known_values_only() {
        assert_eq!("bulk".parse::<OutputMode>(), Ok(OutputMode::Bulk));
        assert!(matches!(
            "verbose".parse::<OutputMode>(),
            Err(ConfigError::InvalidOutputMode { .. })
        ));
    }

    #[test]
    fn silent_mode_absorbs_and_debug_mode_returns() {
        assert!(ErrorMode::Silent.gate(crate::QueryError::MissingObject).is_ok());
        assert!(ErrorMode::Debug.gate(crate::QueryError::MissingObject).is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"version":"3","error_mode":"debug"}"#).expect("valid config");
        assert_eq!(config.version, "3");
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.error_mode.is_debug());
    }
}
