//! Request and response types for outer surfaces
//!
//! These are the shapes the CLI (or any other front end) exchanges with the
//! services. Requests are validated here before a store is touched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entry::parse_entry_date;
use crate::domain::result::{Error, Result};
use crate::domain::{AccountId, NewEntry, UserAccount};

/// What a caller learns about a fresh registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub account_id: AccountId,
    pub email: String,
}

impl From<&UserAccount> for RegisterResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
        }
    }
}

/// Body of an append-entry request
///
/// `amount` accepts a JSON number or a decimal string. `date` is optional
/// and defaults to today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEntryRequest {
    pub amount: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewEntryRequest {
    pub fn new(amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            date: None,
            description: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse a JSON request body
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::validation(format!("invalid entry: {}", e)))
    }

    /// Validate into an entry ready for the store
    pub fn into_new_entry(self) -> Result<NewEntry> {
        let mut entry = NewEntry::new(self.amount, self.category);
        if let Some(date) = self.date.as_deref().filter(|d| !d.trim().is_empty()) {
            entry = entry.with_date(parse_entry_date(date)?);
        }
        if let Some(description) = self.description {
            entry = entry.with_description(description);
        }
        entry.validate()
    }
}
