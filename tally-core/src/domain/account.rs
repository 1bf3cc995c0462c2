//! User account domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entry::Entry;
use super::ids::AccountId;

/// A registered user together with their income and expense entries
///
/// Both sequences are kept in insertion order. The password hash never
/// leaves the process through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub income: Vec<Entry>,
    pub expenses: Vec<Entry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Entries of one collection
    pub fn entries(&self, collection: Collection) -> &[Entry] {
        match collection {
            Collection::Income => &self.income,
            Collection::Expense => &self.expenses,
        }
    }

    pub(crate) fn entries_mut(&mut self, collection: Collection) -> &mut Vec<Entry> {
        match collection {
            Collection::Income => &mut self.income,
            Collection::Expense => &mut self.expenses,
        }
    }
}

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
