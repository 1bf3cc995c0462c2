//! Entry collections owned by an account

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// One of the two entry sequences an account owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Income,
    Expense,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Income, Collection::Expense];

    /// Name stored in the `collection` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Income => "income",
            Collection::Expense => "expense",
        }
    }

    pub(crate) fn from_storage(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(Collection::Income),
            "expense" => Ok(Collection::Expense),
            other => Err(Error::storage(format!("unknown collection '{}' in store", other))),
        }
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "incomes" => Ok(Collection::Income),
            "expense" | "expenses" => Ok(Collection::Expense),
            other => Err(Error::validation(format!(
                "unknown collection '{}', expected income or expense",
                other
            ))),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
