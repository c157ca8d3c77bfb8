use secrecy::SecretString;
use serde::Deserialize;

use super::{
    AnyAuthenticator, AuthType, PardotAuthenticator, PardotCredentials, SalesforceAuthenticator,
    SalesforceCredentials,
};
use crate::ConfigError;

const BUSINESS_UNIT_ID_LEN: usize = 18;

/// Every credential either flow may need. The factory hands each flow only its own subset.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
    #[serde(default)]
    pub user_key: Option<String>,
    #[serde(default)]
    pub security_token: Option<SecretString>,
    #[serde(default)]
    pub business_unit_id: Option<String>,
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default)]
    pub consumer_secret: Option<SecretString>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
            user_key: None,
            security_token: None,
            business_unit_id: None,
            consumer_key: None,
            consumer_secret: None,
        }
    }

    pub fn with_user_key(mut self, user_key: impl Into<String>) -> Self {
        self.user_key = Some(user_key.into());
        self
    }

    pub fn with_security_token(mut self, security_token: impl Into<String>) -> Self {
        self.security_token = Some(SecretString::new(security_token.into()));
        self
    }

    pub fn with_business_unit_id(mut self, business_unit_id: impl Into<String>) -> Self {
        self.business_unit_id = Some(business_unit_id.into());
        self
    }

    pub fn with_consumer(
        mut self,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        self.consumer_key = Some(consumer_key.into());
        self.consumer_secret = Some(SecretString::new(consumer_secret.into()));
        self
    }

    /// Reads `PARDOT_EMAIL` and `PARDOT_PASSWORD` (required) plus the optional
    /// `PARDOT_USER_KEY`, `PARDOT_SECURITY_TOKEN`, `PARDOT_BUSINESS_UNIT_ID`,
    /// `PARDOT_CONSUMER_KEY` and `PARDOT_CONSUMER_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            std::env::var(name).map_err(|_| ConfigError::MissingEnv { name })
        };
        let optional = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());

        Ok(Self {
            email: required("PARDOT_EMAIL")?,
            password: SecretString::new(required("PARDOT_PASSWORD")?),
            user_key: optional("PARDOT_USER_KEY"),
            security_token: optional("PARDOT_SECURITY_TOKEN").map(SecretString::new),
            business_unit_id: optional("PARDOT_BUSINESS_UNIT_ID"),
            consumer_key: optional("PARDOT_CONSUMER_KEY"),
            consumer_secret: optional("PARDOT_CONSUMER_SECRET").map(SecretString::new),
        })
    }
}

/// Selects the authenticator for a configured auth-type tag.
pub struct AuthenticatorFactory;

impl AuthenticatorFactory {
    /// Parses `tag` (`PARDOT` or `OAUTH`) and builds the matching authenticator.
    pub fn build(tag: &str, credentials: Credentials) -> Result<AnyAuthenticator, ConfigError> {
        Self::build_for(tag.parse()?, credentials)
    }

    pub fn build_for(
        auth_type: AuthType,
        credentials: Credentials,
    ) -> Result<AnyAuthenticator, ConfigError> {
        match auth_type {
            AuthType::Pardot => Ok(AnyAuthenticator::Pardot(PardotAuthenticator::new(
                PardotCredentials {
                    email: credentials.email,
                    password: credentials.password,
                    user_key: credentials.user_key,
                },
            ))),
            AuthType::OAuth => {
                let missing = |field: &'static str| ConfigError::MissingCredential {
                    auth_type: AuthType::OAuth.as_str(),
                    field,
                };
                let business_unit_id = credentials
                    .business_unit_id
                    .ok_or_else(|| missing("business_unit_id"))?;
                validate_business_unit_id(&business_unit_id)?;

                Ok(AnyAuthenticator::Salesforce(SalesforceAuthenticator::new(
                    SalesforceCredentials {
                        email: credentials.email,
                        password: credentials.password,
                        security_token: credentials
                            .security_token
                            .ok_or_else(|| missing("security_token"))?,
                        business_unit_id,
                        consumer_key: credentials
                            .consumer_key
                            .ok_or_else(|| missing("consumer_key"))?,
                        consumer_secret: credentials
                            .consumer_secret
                            .ok_or_else(|| missing("consumer_secret"))?,
                    },
                )))
            }
        }
    }
}

fn validate_business_unit_id(value: &str) -> Result<(), ConfigError> {
    let valid = value.len() == BUSINESS_UNIT_ID_LEN
        && value.bytes().all(|byte| byte.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidBusinessUnitId {
            value: value.to_owned(),
        })
    }
}
