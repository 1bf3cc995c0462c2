//! Status service - store-wide counts and database location

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbAccountStore;
use crate::domain::result::Result;
use crate::ports::AccountStore;

/// Status service for the `status` command
pub struct StatusService {
    store: Arc<DuckDbAccountStore>,
}

impl StatusService {
    pub fn new(store: Arc<DuckDbAccountStore>) -> Self {
        Self { store }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        Ok(StatusSummary {
            total_accounts: self.store.count_accounts()?,
            total_entries: self.store.count_entries()?,
            database_path: self
                .store
                .db_path()
                .map(|p| p.display().to_string()),
            database_size: self.store.db_size()?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub total_entries: i64,
    pub database_path: Option<String>,
    /// Bytes on disk
    pub database_size: u64,
}
