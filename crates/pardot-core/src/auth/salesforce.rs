use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{AuthContext, AuthSession, AuthType, Authenticator};
use crate::http_client::{HttpAuth, HttpRequest};
use crate::AuthError;

const GRANT_TYPE: &str = "password";
const TOKEN_EXCHANGE_FAILURE: &str = "Unable to authenticate with SF OAuth. Check credentials.";

/// Credentials of the Salesforce OAuth (business unit) flow.
#[derive(Debug, Clone)]
pub struct SalesforceCredentials {
    pub email: String,
    pub password: SecretString,
    /// Appended to the password for the password grant.
    pub security_token: SecretString,
    /// Starts with `0Uv`, 18 characters.
    pub business_unit_id: String,
    /// Connected app with the `pardot_api` scope.
    pub consumer_key: String,
    pub consumer_secret: SecretString,
}

/// OAuth flow: exchanges a password grant for a bearer token.
///
/// The session is marked successful before the exchange runs and a failed exchange does
/// not undo it. In silent mode a query therefore proceeds without a usable token.
#[derive(Debug)]
pub struct SalesforceAuthenticator {
    credentials: SalesforceCredentials,
    session: AuthSession,
}

impl SalesforceAuthenticator {
    pub fn new(credentials: SalesforceCredentials) -> Self {
        let session = AuthSession::with_business_unit_id(credentials.business_unit_id.clone());
        Self {
            credentials,
            session,
        }
    }

    pub fn credentials(&self) -> &SalesforceCredentials {
        &self.credentials
    }

    pub fn business_unit_id(&self) -> Option<&str> {
        self.session.business_unit_id()
    }

    /// Switches subsequent queries to another business unit.
    pub fn set_business_unit_id(&mut self, business_unit_id: impl Into<String>) {
        self.session.set_business_unit_id(business_unit_id.into());
    }

    fn token_form(&self) -> BTreeMap<String, String> {
        let mut form = BTreeMap::new();
        form.insert(String::from("grant_type"), String::from(GRANT_TYPE));
        form.insert(String::from("client_id"), self.credentials.consumer_key.clone());
        form.insert(
            String::from("client_secret"),
            self.credentials.consumer_secret.expose_secret().clone(),
        );
        form.insert(String::from("username"), self.credentials.email.clone());
        form.insert(
            String::from("password"),
            format!(
                "{}{}",
                self.credentials.password.expose_secret(),
                self.credentials.security_token.expose_secret()
            ),
        );
        form
    }

    async fn exchange_token(&self, context: AuthContext<'_>) -> Result<String, String> {
        let request =
            HttpRequest::post(context.config.token_url.as_str()).with_form(self.token_form());
        let response = context
            .http_client
            .execute(request)
            .await
            .map_err(|error| error.to_string())?;

        let body: Value =
            serde_json::from_str(&response.body).map_err(|error| error.to_string())?;
        if !response.is_success() {
            let description = body
                .get("error_description")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("no error description");
            return Err(format!("HTTP {}: {description}", response.status));
        }

        body.get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| String::from("token response did not contain access_token"))
    }
}

impl Authenticator for SalesforceAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::OAuth
    }

    fn session(&self) -> &AuthSession {
        &self.session
    }

    fn do_authentication<'a>(
        &'a mut self,
        context: AuthContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>> {
        Box::pin(async move {
            self.session.mark_succeeded();
            tracing::debug!(email = %self.credentials.email, "requesting salesforce oauth token");

            match self.exchange_token(context).await {
                Ok(token) => {
                    self.session.set_api_key(token);
                    Ok(())
                }
                Err(reason) => {
                    tracing::debug!(%reason, "salesforce token exchange failed");
                    Err(AuthError::TokenExchange(String::from(TOKEN_EXCHANGE_FAILURE)))
                }
            }
        })
    }

    fn header_options(&self) -> Vec<HttpAuth> {
        vec![
            HttpAuth::BearerToken(self.session.api_key().unwrap_or_default().to_owned()),
            HttpAuth::header(
                "Pardot-Business-Unit-Id",
                self.session.business_unit_id().unwrap_or_default(),
            ),
        ]
    }
}
