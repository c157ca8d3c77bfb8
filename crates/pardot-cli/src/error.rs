use pardot_core::{ConfigError, PardotError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pardot(#[from] PardotError),

    #[error("invalid argument: {0}")]
    Usage(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::Pardot(PardotError::Config(error))
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Pardot(error) => match error {
                PardotError::Config(_) | PardotError::Validation(_) | PardotError::Query(_) => 2,
                PardotError::Api(_) => 3,
                PardotError::Serialization(_) => 4,
                PardotError::Auth(_) => 5,
                PardotError::Transport(_) => 6,
            },
            Self::Usage(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use pardot_core::{ApiError, ValidationError};

    use super::*;

    #[test]
    fn exit_codes_follow_error_category() {
        let validation = CliError::from(PardotError::from(ValidationError::UnknownField {
            field: String::from("colour"),
        }));
        assert_eq!(validation.exit_code(), 2);

        let api = CliError::from(PardotError::from(ApiError::Single(String::from("bad"))));
        assert_eq!(api.exit_code(), 3);

        let config = CliError::from(ConfigError::MissingEnv {
            name: "PARDOT_EMAIL",
        });
        assert_eq!(config.exit_code(), 2);

        let io = CliError::from(std::io::Error::other("missing file"));
        assert_eq!(io.exit_code(), 10);
    }
}
