use super::{PardotObject, Queryable, Writable};
use crate::validator::{FieldRules, Validator};

/// Company-level record grouping prospects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProspectAccount;

impl PardotObject for ProspectAccount {
    const OBJECT: &'static str = "prospectAccount";
}

impl Queryable for ProspectAccount {
    fn criteria() -> FieldRules {
        FieldRules::new()
            .with("created_after", Validator::Date)
            .with("created_before", Validator::Date)
            .with("id_greater_than", Validator::PositiveInt)
            .with("id_less_than", Validator::PositiveInt)
            .with("name", Validator::String)
            .with("updated_before", Validator::Date)
            .with("updated_after", Validator::Date)
    }

    fn navigation() -> FieldRules {
        FieldRules::navigation(&["created_at", "id", "name", "value"])
    }
}

impl Writable for ProspectAccount {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ValidationError;

    #[test]
    fn accepts_documented_query_parameters() {
        let params = json!({
            "created_after": "2024-01-01",
            "id_greater_than": 100,
            "name": "Acme",
            "fields": ["id", "name"],
            "limit": 50,
            "sort_by": "value",
            "sort_order": "descending"
        });

        assert!(ProspectAccount::query_rules()
            .validate(params.as_object().expect("object"))
            .is_ok());
    }

    #[test]
    fn rejects_unsupported_sort_column() {
        let params = json!({"sort_by": "email"});

        let error = ProspectAccount::query_rules()
            .validate(params.as_object().expect("object"))
            .expect_err("must fail");
        assert!(matches!(error, ValidationError::InvalidValue { .. }));
    }
}
