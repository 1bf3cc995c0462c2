//! Tally Core - Business logic for personal income and expense tracking
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (UserAccount, Entry, aggregates)
//! - **ports**: Trait definitions for external dependencies (AccountStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB)
//! - **api**: Request/response shapes for outer surfaces
//! - **schema**: Versioned DuckDB schemas

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod ports;
pub mod schema;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::duckdb::DuckDbAccountStore;
use config::Config;
use ports::AccountStore;
use services::*;

// Re-export commonly used types at crate root
pub use api::{NewEntryRequest, RegisterResponse};
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{
    AccountId, Collection, Entry, EntryId, MaxIncomeAndExpense, NetIncome, Summary, Totals,
    Transaction, UserAccount,
};
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService};

/// Main context for Tally operations
///
/// Owns the store handle and every service built on it. There is no global
/// store: each context opens its own and hands it to the services.
pub struct TallyContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<DuckDbAccountStore>,
    pub account_service: AccountService,
    pub entry_service: EntryService,
    pub aggregation_service: AggregationService,
    pub status_service: StatusService,
}

impl TallyContext {
    /// Open the data directory, creating it and the database if needed
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let store = Arc::new(DuckDbAccountStore::open(&config.database_path(data_dir))?);
        Ok(Self::with_store(config, data_dir.to_path_buf(), store))
    }

    /// Build a context around an already opened store
    pub fn with_store(config: Config, data_dir: PathBuf, store: Arc<DuckDbAccountStore>) -> Self {
        let shared: Arc<dyn AccountStore> = store.clone();

        let account_service = AccountService::new(
            Arc::clone(&shared),
            PasswordHasher::new(config.password_hashing),
        );
        let entry_service = EntryService::new(Arc::clone(&shared));
        let aggregation_service = AggregationService::new(shared);
        let status_service = StatusService::new(Arc::clone(&store));

        Self {
            config,
            data_dir,
            store,
            account_service,
            entry_service,
            aggregation_service,
            status_service,
        }
    }

    /// Flush pending writes and release the database
    pub fn close(self) -> Result<()> {
        self.store.checkpoint()
    }
}
