use super::{PardotObject, Queryable, Writable};
use crate::validator::{FieldRules, Validator};

#[derive(Debug, Clone, Copy, Default)]
pub struct Campaign;

impl PardotObject for Campaign {
    const OBJECT: &'static str = "campaign";
}

impl Queryable for Campaign {
    fn criteria() -> FieldRules {
        FieldRules::new()
            .with("id_greater_than", Validator::PositiveInt)
            .with("id_less_than", Validator::PositiveInt)
            .with("name", Validator::String)
    }

    fn navigation() -> FieldRules {
        FieldRules::navigation(&["created_at", "id", "name", "cost"])
    }
}

impl Writable for Campaign {}
