//! Per-object queries.
//!
//! Objects only declare their name, which parameters their `query` operator accepts and
//! which write operations they support. The operations themselves are shared by
//! [`ObjectQuery`], gated by marker traits:
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`Queryable`] | `query`, `read` |
//! | [`Writable`] | `create`, `update`, `delete` |
//! | [`BatchObject`] | `batch_create`, `batch_update`, `batch_upsert` |

mod account;
mod campaign;
mod prospect;
mod prospect_account;

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::PardotApi;
use crate::query::Query;
use crate::validator::FieldRules;
use crate::PardotError;

pub use account::Account;
pub use campaign::Campaign;
pub use prospect::Prospect;
pub use prospect_account::ProspectAccount;

/// Result field of the `query` operator.
pub const QUERY_RESULT_FIELD: &str = "result";

/// A remote object type.
pub trait PardotObject {
    /// Object name used in the endpoint path and as the result field of single-record
    /// operations.
    const OBJECT: &'static str;
}

/// Objects that support the `query` and `read` operators.
pub trait Queryable: PardotObject {
    fn criteria() -> FieldRules;

    fn navigation() -> FieldRules;

    /// Every parameter the `query` operator accepts.
    fn query_rules() -> FieldRules {
        Self::criteria().merge(Self::navigation())
    }
}

/// Objects that support `create`, `update` and `delete`.
pub trait Writable: PardotObject {}

/// Objects that accept batch operations.
pub trait BatchObject: Writable {
    /// Form field (and JSON wrapper key) that carries the batch payload.
    const JSON_KEY: &'static str;
}

/// Query bound to the object `O`.
pub struct ObjectQuery<'a, O> {
    query: Query<'a>,
    object: PhantomData<O>,
}

impl<'a, O: PardotObject> ObjectQuery<'a, O> {
    pub(crate) fn new(api: &'a mut PardotApi) -> Self {
        let mut query = Query::new(api);
        query.set_object(O::OBJECT);
        Self {
            query,
            object: PhantomData,
        }
    }

    /// The underlying query, for operators this crate does not model.
    pub fn raw(&mut self) -> &mut Query<'a> {
        &mut self.query
    }

    async fn send(
        &mut self,
        operator: String,
        data: Map<String, Value>,
        result_field: &str,
    ) -> Result<Option<Value>, PardotError> {
        self.query
            .set_operator(operator)
            .set_data(data)
            .clear_json()
            .request(result_field)
            .await
    }

    async fn send_batch(
        &mut self,
        operator: &str,
        json_key: &str,
        payload: Value,
    ) -> Result<Option<Value>, PardotError> {
        self.query
            .set_operator(operator)
            .set_json(json_key, payload)
            .request(O::OBJECT)
            .await
    }
}

impl<'a, O: Queryable> ObjectQuery<'a, O> {
    /// Validates `params` against the object's criteria and navigation rules, then runs
    /// the `query` operator. Invalid parameters never reach the network.
    pub async fn query(
        &mut self,
        params: Map<String, Value>,
    ) -> Result<Option<Value>, PardotError> {
        O::query_rules().validate(&params)?;
        self.send(String::from("query"), params, QUERY_RESULT_FIELD).await
    }

    pub async fn read(&mut self, id: u64) -> Result<Option<Value>, PardotError> {
        self.send(format!("read/id/{id}"), Map::new(), O::OBJECT).await
    }
}

impl<'a, O: Writable> ObjectQuery<'a, O> {
    pub async fn create(
        &mut self,
        data: Map<String, Value>,
    ) -> Result<Option<Value>, PardotError> {
        self.send(String::from("create"), data, O::OBJECT).await
    }

    pub async fn update(
        &mut self,
        id: u64,
        data: Map<String, Value>,
    ) -> Result<Option<Value>, PardotError> {
        self.send(format!("update/id/{id}"), data, O::OBJECT).await
    }

    pub async fn delete(&mut self, id: u64) -> Result<Option<Value>, PardotError> {
        self.send(format!("delete/id/{id}"), Map::new(), O::OBJECT).await
    }
}

impl<'a, O: BatchObject> ObjectQuery<'a, O> {
    pub async fn batch_create<T: Serialize>(
        &mut self,
        records: &[T],
    ) -> Result<Option<Value>, PardotError> {
        let payload = batch_payload(O::JSON_KEY, records)?;
        self.send_batch("batchCreate", O::JSON_KEY, payload).await
    }

    pub async fn batch_update<T: Serialize>(
        &mut self,
        records: &[T],
    ) -> Result<Option<Value>, PardotError> {
        let payload = batch_payload(O::JSON_KEY, records)?;
        self.send_batch("batchUpdate", O::JSON_KEY, payload).await
    }

    pub async fn batch_upsert<T: Serialize>(
        &mut self,
        records: &[T],
    ) -> Result<Option<Value>, PardotError> {
        let payload = batch_payload(O::JSON_KEY, records)?;
        self.send_batch("batchUpsert", O::JSON_KEY, payload).await
    }
}

/// `{<json_key>: [records...]}`
fn batch_payload<T: Serialize>(json_key: &str, records: &[T]) -> Result<Value, PardotError> {
    let mut wrapper = Map::new();
    wrapper.insert(json_key.to_owned(), serde_json::to_value(records)?);
    Ok(Value::Object(wrapper))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn batch_payload_wraps_records_under_key() {
        let payload = batch_payload("prospects", &[json!({"email": "a@example.com"})])
            .expect("serializable");
        assert_eq!(payload, json!({"prospects": [{"email": "a@example.com"}]}));
    }

    #[test]
    fn query_rules_combine_criteria_and_navigation() {
        let rules = Campaign::query_rules();
        assert!(rules.get("name").is_some());
        assert!(rules.get("sort_order").is_some());
        assert!(rules.get("email").is_none());
    }
}
