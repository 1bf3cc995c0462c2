//! Entry domain model

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::EntryId;
use super::result::{Error, Result};

/// Fractional digits kept by the `DECIMAL(38, 10)` amount column
pub const AMOUNT_SCALE: u32 = 10;

/// Integer digits left in `DECIMAL(38, 10)`; magnitudes must stay below 10^28
const AMOUNT_INTEGER_DIGITS: u32 = 28;

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
}

/// An entry that has passed validation but has not been stored yet
///
/// The store assigns the id on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
}

impl NewEntry {
    /// Create a new entry dated today with an empty description
    pub fn new(amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            date: Utc::now().date_naive(),
            description: String::new(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Normalize and validate in place
    ///
    /// Category and description are trimmed. Any signed amount is accepted
    /// as long as the amount column can hold it without rounding.
    pub fn validate(mut self) -> Result<Self> {
        self.category = self.category.trim().to_string();
        self.description = self.description.trim().to_string();
        self.amount = self.amount.normalize();

        if self.category.is_empty() {
            return Err(Error::validation("category cannot be empty"));
        }
        if self.amount.scale() > AMOUNT_SCALE {
            return Err(Error::validation(format!(
                "amount has more than {} decimal places",
                AMOUNT_SCALE
            )));
        }
        let limit = Decimal::from_i128_with_scale(10i128.pow(AMOUNT_INTEGER_DIGITS), 0);
        if self.amount.abs() >= limit {
            return Err(Error::validation("amount is too large"));
        }
        Ok(self)
    }
}

/// Parse a caller-supplied entry date
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (converted to the UTC calendar
/// date) and naive `YYYY-MM-DDTHH:MM:SS` timestamps.
pub fn parse_entry_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .map_err(|_| Error::validation(format!("'{}' is not a valid date, use YYYY-MM-DD", s)))
}
