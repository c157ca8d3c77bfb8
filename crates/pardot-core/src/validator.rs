//! Parameter validators for query criteria and navigation fields.
//!
//! Each [`Validator`] is a stateless predicate over a raw JSON value. Object
//! queries declare a [`FieldRules`] map (field name to validator) and check a
//! whole parameter set against it before a request is built.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::ValidationError;

/// Relative date keywords understood by the API in date criteria.
const DATE_KEYWORDS: [&str; 5] = ["today", "yesterday", "last_7_days", "this_month", "last_month"];

pub const SORT_ASCENDING: &str = "ascending";
pub const SORT_DESCENDING: &str = "descending";

/// Acceptance rule for a single query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    Date,
    PositiveInt,
    FixedValues(Vec<String>),
    SortOrder,
    Array,
    String,
}

impl Validator {
    pub fn fixed_values<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FixedValues(allowed.into_iter().map(Into::into).collect())
    }

    /// Rule name used in validation error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::PositiveInt => "positive integer",
            Self::FixedValues(_) => "fixed values",
            Self::SortOrder => "sort order",
            Self::Array => "array",
            Self::String => "string",
        }
    }

    pub fn validate(&self, value: &Value) -> bool {
        match self {
            Self::Date => value.as_str().is_some_and(is_date),
            Self::PositiveInt => is_positive_int(value),
            Self::FixedValues(allowed) => scalar_text(value)
                .is_some_and(|text| allowed.iter().any(|candidate| *candidate == text)),
            Self::SortOrder => matches!(
                value.as_str(),
                Some(SORT_ASCENDING) | Some(SORT_DESCENDING)
            ),
            Self::Array => value.is_array(),
            Self::String => value.is_string(),
        }
    }
}

fn is_date(input: &str) -> bool {
    if DATE_KEYWORDS.contains(&input) {
        return true;
    }

    let date_only = format_description!("[year]-[month]-[day]");
    let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let iso_local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    Date::parse(input, date_only).is_ok()
        || PrimitiveDateTime::parse(input, spaced).is_ok()
        || PrimitiveDateTime::parse(input, iso_local).is_ok()
        || time::OffsetDateTime::parse(input, &Rfc3339).is_ok()
}

fn is_positive_int(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_u64().is_some_and(|n| n >= 1),
        Value::String(text) => {
            !text.is_empty()
                && text.bytes().all(|byte| byte.is_ascii_digit())
                && text.bytes().any(|byte| byte != b'0')
        }
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Declared fields of a query and the rule applied to each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    rules: BTreeMap<String, Validator>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, validator: Validator) -> Self {
        self.rules.insert(field.into(), validator);
        self
    }

    /// Shared navigation rules: field selection, paging and sorting.
    pub fn navigation(sort_by: &[&str]) -> Self {
        Self::new()
            .with("fields", Validator::Array)
            .with("limit", Validator::PositiveInt)
            .with("offset", Validator::PositiveInt)
            .with("sort_by", Validator::fixed_values(sort_by.iter().copied()))
            .with("sort_order", Validator::SortOrder)
    }

    /// Union of two rule sets. Rules from `other` win on a shared field name.
    pub fn merge(mut self, other: FieldRules) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Validator> {
        self.rules.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Accepts the parameter set only if every provided field is declared and passes its rule.
    pub fn validate(&self, params: &Map<String, Value>) -> Result<(), ValidationError> {
        for (field, value) in params {
            let validator = self
                .rules
                .get(field)
                .ok_or_else(|| ValidationError::UnknownField {
                    field: field.clone(),
                })?;

            if !validator.validate(value) {
                return Err(ValidationError::InvalidValue {
                    field: field.clone(),
                    rule: validator.name(),
                });
            }
        }
        Ok(())
    }
}
