//! Generic query builder.
//!
//! A [`Query`] is configured with an object, an operator and either form data or a
//! JSON payload, then executed with [`Query::request`]. Setters overwrite the field
//! they touch; a query may be reconfigured and executed again.
//!
//! ```rust,ignore
//! let mut query = api.query();
//! let prospect = query
//!     .set_object("prospect")
//!     .set_operator("read/id/42")
//!     .request("prospect")
//!     .await?;
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::api::PardotApi;
use crate::config::{ApiConfig, OutputMode};
use crate::http_client::HttpRequest;
use crate::{PardotError, QueryError};

/// JSON payload sent as a single form field named by `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPayload {
    pub key: String,
    pub payload: Value,
}

/// Shape of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDefinition {
    object: Option<String>,
    operator: Option<String>,
    data: Map<String, Value>,
    json: Option<JsonPayload>,
}

impl QueryDefinition {
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn json(&self) -> Option<&JsonPayload> {
        self.json.as_ref()
    }

    /// `https://<host>/api/<object>/version/<version>/do/<operator>`
    pub fn endpoint(&self, config: &ApiConfig) -> Result<String, QueryError> {
        let object = self.object().ok_or(QueryError::MissingObject)?;
        let operator = self.operator().ok_or(QueryError::MissingOperator)?;
        Ok(config.endpoint(object, operator))
    }

    /// Form body for the request. With a JSON payload only the payload field and the
    /// control fields are sent; otherwise the data map plus the control fields.
    pub fn form_fields(
        &self,
        format: &str,
        output: OutputMode,
    ) -> Result<BTreeMap<String, String>, serde_json::Error> {
        let mut form = BTreeMap::new();
        match &self.json {
            Some(json) => {
                form.insert(json.key.clone(), serde_json::to_string(&json.payload)?);
            }
            None => {
                for (key, value) in &self.data {
                    flatten_form_value(key.clone(), value, &mut form);
                }
            }
        }
        form.insert(String::from("format"), format.to_owned());
        form.insert(String::from("output"), output.as_str().to_owned());
        Ok(form)
    }
}

/// Nested values use bracket keys: `fields[0]`, `filter[name]`. Nulls are skipped.
fn flatten_form_value(key: String, value: &Value, form: &mut BTreeMap<String, String>) {
    match value {
        Value::Null => {}
        Value::String(text) => {
            form.insert(key, text.clone());
        }
        Value::Bool(_) | Value::Number(_) => {
            form.insert(key, value.to_string());
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_form_value(format!("{key}[{index}]"), item, form);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                flatten_form_value(format!("{key}[{name}]"), item, form);
            }
        }
    }
}

/// Mutable query builder bound to one client.
pub struct Query<'a> {
    api: &'a mut PardotApi,
    definition: QueryDefinition,
}

impl<'a> Query<'a> {
    pub(crate) fn new(api: &'a mut PardotApi) -> Self {
        Self {
            api,
            definition: QueryDefinition::default(),
        }
    }

    pub fn set_object(&mut self, object: impl Into<String>) -> &mut Self {
        self.definition.object = Some(object.into());
        self
    }

    pub fn set_operator(&mut self, operator: impl Into<String>) -> &mut Self {
        self.definition.operator = Some(operator.into());
        self
    }

    pub fn set_data(&mut self, data: Map<String, Value>) -> &mut Self {
        self.definition.data = data;
        self
    }

    pub fn set_json(&mut self, key: impl Into<String>, payload: Value) -> &mut Self {
        self.definition.json = Some(JsonPayload {
            key: key.into(),
            payload,
        });
        self
    }

    pub fn clear_json(&mut self) -> &mut Self {
        self.definition.json = None;
        self
    }

    pub fn definition(&self) -> &QueryDefinition {
        &self.definition
    }

    pub fn api(&self) -> &PardotApi {
        &*self.api
    }

    /// Builds the HTTP request for the current definition and authenticator state.
    pub fn build_request(&self) -> Result<HttpRequest, PardotError> {
        let endpoint = self.definition.endpoint(self.api.config())?;
        let form = self
            .definition
            .form_fields(self.api.formatter().format(), self.api.config().output)?;

        let request = self
            .api
            .authenticator()
            .header_options()
            .iter()
            .fold(HttpRequest::post(endpoint), |request, auth| {
                request.with_auth(auth)
            });
        Ok(request.with_form(form))
    }

    /// Executes the query and returns `result_field` from the decoded payload, or the
    /// whole payload when that field is absent.
    ///
    /// Returns `Ok(None)` when authentication did not succeed, and for transport
    /// failures in silent mode.
    pub async fn request(&mut self, result_field: &str) -> Result<Option<Value>, PardotError> {
        self.definition.endpoint(self.api.config())?;

        if !self.api.ensure_authenticated().await? {
            tracing::debug!(
                object = self.definition.object().unwrap_or_default(),
                "skipping request without a successful authentication"
            );
            return Ok(None);
        }

        let request = self.build_request()?;
        self.api.dispatch(request, result_field).await
    }
}
