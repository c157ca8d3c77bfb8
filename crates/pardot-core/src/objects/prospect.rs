use serde_json::{Map, Value};

use super::{BatchObject, ObjectQuery, PardotObject, Queryable, Writable};
use crate::validator::{FieldRules, Validator};
use crate::PardotError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Prospect;

impl PardotObject for Prospect {
    const OBJECT: &'static str = "prospect";
}

impl Queryable for Prospect {
    fn criteria() -> FieldRules {
        let flag = || Validator::fixed_values(["true", "false"]);

        FieldRules::new()
            .with("assigned", flag())
            .with("assigned_to_user", flag())
            .with("created_after", Validator::Date)
            .with("created_before", Validator::Date)
            .with("deleted", flag())
            .with("grade_equal_to", Validator::String)
            .with("grade_greater_than", Validator::String)
            .with("grade_less_than", Validator::String)
            .with("id_greater_than", Validator::PositiveInt)
            .with("id_less_than", Validator::PositiveInt)
            .with("is_starred", flag())
            .with("last_activity_before", Validator::Date)
            .with("last_activity_after", Validator::Date)
            .with("last_activity_never", flag())
            .with("list_id", Validator::PositiveInt)
            .with("new", flag())
            .with("score_equal_to", Validator::PositiveInt)
            .with("score_greater_than", Validator::PositiveInt)
            .with("score_less_than", Validator::PositiveInt)
            .with("updated_after", Validator::Date)
            .with("updated_before", Validator::Date)
    }

    fn navigation() -> FieldRules {
        FieldRules::navigation(&["created_at", "id", "last_activity_at", "updated_at"])
    }
}

impl Writable for Prospect {}

impl BatchObject for Prospect {
    const JSON_KEY: &'static str = "prospects";
}

impl<'a> ObjectQuery<'a, Prospect> {
    pub async fn read_by_email(&mut self, email: &str) -> Result<Option<Value>, PardotError> {
        self.send(by_email("read", email), Map::new(), Prospect::OBJECT).await
    }

    pub async fn create_with_email(
        &mut self,
        email: &str,
        data: Map<String, Value>,
    ) -> Result<Option<Value>, PardotError> {
        self.send(by_email("create", email), data, Prospect::OBJECT).await
    }

    pub async fn upsert_by_id(
        &mut self,
        id: u64,
        data: Map<String, Value>,
    ) -> Result<Option<Value>, PardotError> {
        self.send(format!("upsert/id/{id}"), data, Prospect::OBJECT).await
    }

    pub async fn upsert_by_email(
        &mut self,
        email: &str,
        data: Map<String, Value>,
    ) -> Result<Option<Value>, PardotError> {
        self.send(by_email("upsert", email), data, Prospect::OBJECT).await
    }
}

fn by_email(operator: &str, email: &str) -> String {
    format!("{operator}/email/{}", urlencoding::encode(email))
}
