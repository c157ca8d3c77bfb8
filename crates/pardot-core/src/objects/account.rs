use serde_json::{Map, Value};

use super::{ObjectQuery, PardotObject};
use crate::PardotError;

/// The authenticated user's Pardot account. A single record with no identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Account;

impl PardotObject for Account {
    const OBJECT: &'static str = "account";
}

impl<'a> ObjectQuery<'a, Account> {
    pub async fn read(&mut self) -> Result<Option<Value>, PardotError> {
        self.send(String::from("read"), Map::new(), Account::OBJECT).await
    }
}
