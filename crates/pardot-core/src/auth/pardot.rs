use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{AuthContext, AuthSession, AuthType, Authenticator};
use crate::http_client::{HttpAuth, HttpRequest};
use crate::AuthError;

/// Credentials of the legacy api-key flow.
#[derive(Debug, Clone)]
pub struct PardotCredentials {
    pub email: String,
    pub password: SecretString,
    pub user_key: Option<String>,
}

/// Legacy flow: logs in against the API's own login endpoint and keeps the returned api key.
#[derive(Debug)]
pub struct PardotAuthenticator {
    credentials: PardotCredentials,
    session: AuthSession,
}

impl PardotAuthenticator {
    pub fn new(credentials: PardotCredentials) -> Self {
        Self {
            credentials,
            session: AuthSession::default(),
        }
    }

    pub fn credentials(&self) -> &PardotCredentials {
        &self.credentials
    }

    pub fn user_key(&self) -> Option<&str> {
        self.credentials.user_key.as_deref()
    }

    fn login_form(&self) -> BTreeMap<String, String> {
        let mut form = BTreeMap::new();
        form.insert(String::from("email"), self.credentials.email.clone());
        form.insert(
            String::from("password"),
            self.credentials.password.expose_secret().clone(),
        );
        form.insert(
            String::from("user_key"),
            self.credentials.user_key.clone().unwrap_or_default(),
        );
        form.insert(String::from("format"), String::from("json"));
        form
    }
}

impl Authenticator for PardotAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::Pardot
    }

    fn session(&self) -> &AuthSession {
        &self.session
    }

    fn do_authentication<'a>(
        &'a mut self,
        context: AuthContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>> {
        Box::pin(async move {
            self.session.mark_attempted();
            tracing::debug!(email = %self.credentials.email, "requesting pardot api key");

            let request =
                HttpRequest::post(context.config.login_url()).with_form(self.login_form());
            let response = context
                .http_client
                .execute(request)
                .await
                .map_err(AuthError::Transport)?;

            let body: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
            if let Some(message) = body.get("err").and_then(Value::as_str) {
                return Err(AuthError::Rejected {
                    message: message.to_owned(),
                });
            }
            if !response.is_success() {
                return Err(AuthError::Rejected {
                    message: format!("login endpoint returned HTTP {}", response.status),
                });
            }

            let api_key = body
                .get("api_key")
                .and_then(Value::as_str)
                .filter(|key| !key.is_empty())
                .ok_or(AuthError::MissingApiKey)?;

            self.session.set_api_key(api_key.to_owned());
            self.session.mark_succeeded();
            Ok(())
        })
    }

    fn header_options(&self) -> Vec<HttpAuth> {
        vec![HttpAuth::header(
            "Authorization",
            format!(
                "Pardot api_key=\"{}\", user_key=\"{}\"",
                self.session.api_key().unwrap_or_default(),
                self.user_key().unwrap_or_default()
            ),
        )]
    }
}
