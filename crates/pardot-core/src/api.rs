use std::fmt::{Debug, Formatter as FmtFormatter};
use std::sync::Arc;

use serde_json::Value;

use crate::auth::{AuthContext, Authenticator, AuthenticatorFactory, Credentials};
use crate::config::ApiConfig;
use crate::formatter::{Formatter, JsonFormatter};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::objects::{Account, Campaign, ObjectQuery, PardotObject, Prospect, ProspectAccount};
use crate::query::Query;
use crate::{ConfigError, PardotError, TransportError};

/// Pardot API client: configuration, the bound authenticator, the transport and the
/// response formatter.
///
/// The authenticator is fixed for the lifetime of the client and authenticates at most
/// once, on the first request.
pub struct PardotApi {
    config: ApiConfig,
    authenticator: Box<dyn Authenticator>,
    http_client: Arc<dyn HttpClient>,
    formatter: Arc<dyn Formatter>,
}

impl PardotApi {
    /// Builds a client for `auth_type` (`PARDOT` or `OAUTH`) over the reqwest transport.
    pub fn new(
        auth_type: &str,
        credentials: Credentials,
        config: ApiConfig,
    ) -> Result<Self, ConfigError> {
        let authenticator = AuthenticatorFactory::build(auth_type, credentials)?;
        Ok(Self::with_authenticator(authenticator, config))
    }

    pub fn with_authenticator(
        authenticator: impl Authenticator + 'static,
        config: ApiConfig,
    ) -> Self {
        Self {
            config,
            authenticator: Box::new(authenticator),
            http_client: Arc::new(ReqwestHttpClient::default()),
            formatter: Arc::new(JsonFormatter),
        }
    }

    /// Reads `PARDOT_AUTH_TYPE` together with [`Credentials::from_env`] and
    /// [`ApiConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_type = std::env::var("PARDOT_AUTH_TYPE").map_err(|_| ConfigError::MissingEnv {
            name: "PARDOT_AUTH_TYPE",
        })?;
        Self::new(&auth_type, Credentials::from_env()?, ApiConfig::from_env()?)
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Starts an unconfigured query.
    pub fn query(&mut self) -> Query<'_> {
        Query::new(self)
    }

    /// Starts a query bound to the object `O`.
    pub fn object<O: PardotObject>(&mut self) -> ObjectQuery<'_, O> {
        ObjectQuery::new(self)
    }

    pub fn account(&mut self) -> ObjectQuery<'_, Account> {
        self.object()
    }

    pub fn campaigns(&mut self) -> ObjectQuery<'_, Campaign> {
        self.object()
    }

    pub fn prospects(&mut self) -> ObjectQuery<'_, Prospect> {
        self.object()
    }

    pub fn prospect_accounts(&mut self) -> ObjectQuery<'_, ProspectAccount> {
        self.object()
    }

    /// Authenticates if no attempt has been made yet and reports whether the session is
    /// usable. Authentication errors are gated by the configured error mode.
    pub(crate) async fn ensure_authenticated(&mut self) -> Result<bool, PardotError> {
        if !self.authenticator.is_authenticated() {
            let context = AuthContext {
                http_client: self.http_client.as_ref(),
                config: &self.config,
            };
            if let Err(error) = self.authenticator.do_authentication(context).await {
                self.config.error_mode.gate(error)?;
            }
        }
        Ok(self.authenticator.is_authenticated_successfully())
    }

    /// Sends one request and hands the body to the formatter.
    pub(crate) async fn dispatch(
        &self,
        request: HttpRequest,
        result_field: &str,
    ) -> Result<Option<Value>, PardotError> {
        tracing::debug!(url = %request.url, result_field, "dispatching pardot request");

        let response = match self.http_client.execute(request).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                self.config.error_mode.gate(status_error(&response))?;
                return Ok(None);
            }
            Err(error) => {
                self.config.error_mode.gate(TransportError::Http(error))?;
                return Ok(None);
            }
        };

        let data = self.formatter.decode(&response.body, result_field)?;
        Ok(Some(select_field(data, result_field)))
    }
}

impl Debug for PardotApi {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> std::fmt::Result {
        f.debug_struct("PardotApi")
            .field("config", &self.config)
            .field("auth_type", &self.authenticator.auth_type())
            .field("session", self.authenticator.session())
            .field("formatter", &self.formatter)
            .finish()
    }
}

/// The requested field when present and non-null, else the whole payload.
fn select_field(data: Value, result_field: &str) -> Value {
    match data {
        Value::Object(mut map) => match map.remove(result_field) {
            Some(field) if !field.is_null() => field,
            Some(field) => {
                map.insert(result_field.to_owned(), field);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Extracts `@attributes.err_code` and `err` from a non-2xx response body.
fn status_error(response: &HttpResponse) -> TransportError {
    let body: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
    let err_code = body
        .get("@attributes")
        .and_then(|attributes| attributes.get("err_code"))
        .and_then(|code| match code {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        })
        .and_then(|code| u32::try_from(code).ok());
    let message = body
        .get("err")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| String::from("unexpected response status"));

    TransportError::Status {
        status: response.status,
        err_code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ErrorMode;
    use crate::http_client::{HttpError, NoopHttpClient};
    use crate::test_support::{block_on, RecordingHttpClient};

    fn pardot_client(http_client: Arc<dyn HttpClient>, error_mode: ErrorMode) -> PardotApi {
        let credentials =
            Credentials::new("ops@example.com", "hunter2").with_user_key("user-key-1");
        PardotApi::new(
            "PARDOT",
            credentials,
            ApiConfig::default().with_error_mode(error_mode),
        )
        .expect("supported auth type")
        .with_http_client(http_client)
    }

    #[test]
    fn select_field_prefers_requested_key() {
        let data = json!({"@attributes": {"stat": "ok"}, "account": {"id": 3}});
        assert_eq!(select_field(data, "account"), json!({"id": 3}));
    }

    #[test]
    fn select_field_falls_back_to_payload() {
        let data = json!({"@attributes": {"stat": "ok"}, "account": null});
        assert_eq!(select_field(data.clone(), "account"), data);
        assert_eq!(select_field(Value::Bool(true), "result"), Value::Bool(true));
    }

    #[test]
    fn status_error_reads_err_code_and_message() {
        let response = HttpResponse::new(
            400,
            r#"{"@attributes":{"stat":"fail","err_code":"71"},"err":"Input needs to be valid"}"#,
        );
        assert_eq!(
            status_error(&response),
            TransportError::Status {
                status: 400,
                err_code: Some(71),
                message: String::from("Input needs to be valid"),
            }
        );
    }

    #[test]
    fn status_error_tolerates_non_json_bodies() {
        let error = status_error(&HttpResponse::new(502, "<html>bad gateway</html>"));
        assert_eq!(error.err_code(), None);
        assert!(error.to_string().contains("HTTP 502"));
    }

    #[test]
    fn login_without_api_key_yields_no_result_in_silent_mode() {
        let mut api = pardot_client(Arc::new(NoopHttpClient), ErrorMode::Silent);

        let result = block_on(api.account().read()).expect("silent mode absorbs the failure");

        assert_eq!(result, None);
        assert!(api.authenticator().is_authenticated());
        assert!(!api.authenticator().is_authenticated_successfully());
    }

    #[test]
    fn account_read_returns_account_field() {
        let client = Arc::new(RecordingHttpClient::with_responses(vec![
            Ok(HttpResponse::ok_json(r#"{"api_key":"key-abc"}"#)),
            Ok(HttpResponse::ok_json(
                r#"{"@attributes":{"stat":"ok"},"account":{"id":17,"company":"Acme"}}"#,
            )),
        ]));
        let mut api = pardot_client(client.clone(), ErrorMode::Silent);

        let account = block_on(api.account().read()).expect("request succeeds");

        assert_eq!(account, Some(json!({"id": 17, "company": "Acme"})));
        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].url,
            "https://pi.pardot.com/api/account/version/4/do/read"
        );
        assert_eq!(
            requests[1].header("Authorization"),
            Some(r#"Pardot api_key="key-abc", user_key="user-key-1""#)
        );
    }

    #[test]
    fn debug_mode_surfaces_http_status_errors() {
        let client = Arc::new(RecordingHttpClient::with_responses(vec![
            Ok(HttpResponse::ok_json(r#"{"api_key":"key-abc"}"#)),
            Ok(HttpResponse::new(
                503,
                r#"{"@attributes":{"stat":"fail","err_code":66},"err":"Exceeded concurrent request limit"}"#,
            )),
            Err(HttpError::new("connection reset")),
        ]));
        let mut api = pardot_client(client, ErrorMode::Debug);

        let error = block_on(api.account().read()).expect_err("debug mode surfaces status");
        let PardotError::Transport(transport) = error else {
            panic!("expected a transport error");
        };
        assert_eq!(transport.err_code(), Some(66));

        let error = block_on(api.account().read()).expect_err("debug mode surfaces transport");
        assert!(error.to_string().contains("connection reset"));
    }

    #[derive(Debug)]
    struct RawTextFormatter;

    impl Formatter for RawTextFormatter {
        fn format(&self) -> &'static str {
            "text"
        }

        fn decode(&self, body: &str, result_field: &str) -> Result<Value, crate::ApiError> {
            Ok(json!({ result_field: body }))
        }
    }

    #[test]
    fn injected_formatter_drives_format_field_and_decoding() {
        let client = Arc::new(RecordingHttpClient::with_responses(vec![
            Ok(HttpResponse::ok_json(r#"{"api_key":"key-abc"}"#)),
            Ok(HttpResponse::ok_json("<account id=\"17\"/>")),
        ]));
        let mut api = pardot_client(client.clone(), ErrorMode::Silent)
            .with_formatter(Arc::new(RawTextFormatter));

        let account = block_on(api.account().read()).expect("request succeeds");

        assert_eq!(account, Some(json!("<account id=\"17\"/>")));
        assert_eq!(api.formatter().format(), "text");
        assert_eq!(client.recorded_requests()[1].form_field("format"), Some("text"));
    }
}
