//! Client core for the Pardot REST API.
//!
//! This crate contains:
//! - Parameter validators and per-object field rules
//! - The `PARDOT` (api key) and `OAUTH` (Salesforce) authentication flows
//! - The query builder and request pipeline
//! - Response formatting and structured errors
//!
//! ```text
//! PardotApi ──► Query / ObjectQuery ──► Authenticator (once) ──► HttpClient ──► Formatter
//!                    │                                                              │
//!                    └── FieldRules::validate (before any network call)             └── ApiError
//! ```
//!
//! Authentication and transport failures are gated by [`ErrorMode`]: absorbed into
//! `Ok(None)` in silent mode, returned in debug mode. API errors, validation errors and
//! missing query configuration are always returned.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod formatter;
pub mod http_client;
pub mod objects;
pub mod query;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use api::PardotApi;
pub use auth::{
    AnyAuthenticator, AuthContext, AuthSession, AuthType, Authenticator, AuthenticatorFactory,
    Credentials, PardotAuthenticator, PardotCredentials, SalesforceAuthenticator,
    SalesforceCredentials,
};
pub use config::{ApiConfig, ErrorMode, OutputMode};
pub use error::{
    ApiError, AuthError, ConfigError, PardotError, QueryError, TransportError, ValidationError,
};
pub use formatter::{Formatter, JsonFormatter};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use objects::{
    Account, BatchObject, Campaign, ObjectQuery, PardotObject, Prospect, ProspectAccount,
    Queryable, Writable,
};
pub use query::{JsonPayload, Query, QueryDefinition};
pub use validator::{FieldRules, Validator};
