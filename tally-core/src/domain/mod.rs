//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod collection;
pub mod entry;
mod ids;
pub mod result;
pub mod stats;
pub mod transaction;

pub use account::{NewAccount, UserAccount};
pub use collection::Collection;
pub use entry::{Entry, NewEntry};
pub use ids::{AccountId, EntryId};
pub use stats::{CollectionStats, MaxIncomeAndExpense, NetIncome, Summary, Totals};
pub use transaction::Transaction;
