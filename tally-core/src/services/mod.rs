//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod aggregation;
mod entry;
pub mod logging;
mod password;
mod status;

pub use account::{AccountService, MIN_PASSWORD_LEN};
pub use aggregation::AggregationService;
pub use entry::EntryService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use password::PasswordHasher;
pub use status::{StatusService, StatusSummary};
