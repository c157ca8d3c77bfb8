//! Authentication flows for the Pardot API.
//!
//! Two mutually exclusive flows are supported:
//!
//! | Flow | Type | Credentials | Header |
//! |------|------|-------------|--------|
//! | `PARDOT` | [`PardotAuthenticator`] | email, password, user key | `Authorization: Pardot api_key=.., user_key=..` |
//! | `OAUTH` | [`SalesforceAuthenticator`] | email, password, security token, business unit id, consumer key/secret | `Authorization: Bearer ..`, `Pardot-Business-Unit-Id` |
//!
//! An authenticator is selected once per client by [`AuthenticatorFactory`] and
//! attempts authentication at most once over its lifetime.

mod factory;
mod pardot;
mod salesforce;

use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::http_client::{HttpAuth, HttpClient};
use crate::{AuthError, ConfigError};

pub use factory::{AuthenticatorFactory, Credentials};
pub use pardot::{PardotAuthenticator, PardotCredentials};
pub use salesforce::{SalesforceAuthenticator, SalesforceCredentials};

/// Supported authentication flow tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    #[serde(rename = "PARDOT")]
    Pardot,
    #[serde(rename = "OAUTH")]
    OAuth,
}

impl AuthType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pardot => "PARDOT",
            Self::OAuth => "OAUTH",
        }
    }
}

impl Display for AuthType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PARDOT" => Ok(Self::Pardot),
            "OAUTH" => Ok(Self::OAuth),
            other => Err(ConfigError::UnsupportedAuthType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Outcome of an authentication attempt.
///
/// `succeeded` is only ever set together with `attempted`; nothing resets either flag.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    attempted: bool,
    succeeded: bool,
    api_key: Option<String>,
    business_unit_id: Option<String>,
}

impl AuthSession {
    pub(crate) fn with_business_unit_id(business_unit_id: impl Into<String>) -> Self {
        Self {
            business_unit_id: Some(business_unit_id.into()),
            ..Self::default()
        }
    }

    pub const fn attempted(&self) -> bool {
        self.attempted
    }

    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn business_unit_id(&self) -> Option<&str> {
        self.business_unit_id.as_deref()
    }

    pub(crate) fn mark_attempted(&mut self) {
        self.attempted = true;
    }

    pub(crate) fn mark_succeeded(&mut self) {
        self.attempted = true;
        self.succeeded = true;
    }

    pub(crate) fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub(crate) fn set_business_unit_id(&mut self, business_unit_id: String) {
        self.business_unit_id = Some(business_unit_id);
    }
}

impl Debug for AuthSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("attempted", &self.attempted)
            .field("succeeded", &self.succeeded)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("business_unit_id", &self.business_unit_id)
            .finish()
    }
}

/// Collaborators an authenticator needs for its login call.
#[derive(Clone, Copy)]
pub struct AuthContext<'a> {
    pub http_client: &'a dyn HttpClient,
    pub config: &'a ApiConfig,
}

/// Credential flow bound to one client.
pub trait Authenticator: Send + Sync {
    fn auth_type(&self) -> AuthType;

    fn session(&self) -> &AuthSession;

    /// Whether an authentication attempt has been made.
    fn is_authenticated(&self) -> bool {
        self.session().attempted()
    }

    /// Whether the attempt produced a usable session (see the OAuth flow for a caveat).
    fn is_authenticated_successfully(&self) -> bool {
        self.session().succeeded()
    }

    fn api_key(&self) -> Option<&str> {
        self.session().api_key()
    }

    /// Performs the login call and records its outcome in the session.
    fn do_authentication<'a>(
        &'a mut self,
        context: AuthContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>>;

    /// Headers that authorize a query with the current session.
    fn header_options(&self) -> Vec<HttpAuth>;
}

/// Concrete authenticator produced by the factory.
#[derive(Debug)]
pub enum AnyAuthenticator {
    Pardot(PardotAuthenticator),
    Salesforce(SalesforceAuthenticator),
}

impl AnyAuthenticator {
    fn inner(&self) -> &dyn Authenticator {
        match self {
            Self::Pardot(authenticator) => authenticator,
            Self::Salesforce(authenticator) => authenticator,
        }
    }
}

impl Authenticator for AnyAuthenticator {
    fn auth_type(&self) -> AuthType {
        self.inner().auth_type()
    }

    fn session(&self) -> &AuthSession {
        match self {
            Self::Pardot(authenticator) => authenticator.session(),
            Self::Salesforce(authenticator) => authenticator.session(),
        }
    }

    fn do_authentication<'a>(
        &'a mut self,
        context: AuthContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>> {
        match self {
            Self::Pardot(authenticator) => authenticator.do_authentication(context),
            Self::Salesforce(authenticator) => authenticator.do_authentication(context),
        }
    }

    fn header_options(&self) -> Vec<HttpAuth> {
        self.inner().header_options()
    }
}
