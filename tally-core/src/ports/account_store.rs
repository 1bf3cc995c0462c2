//! Account store port - persistence abstraction over user accounts

use crate::domain::result::{Error, Result};
use crate::domain::{
    AccountId, Collection, CollectionStats, Entry, EntryId, NewAccount, NewEntry, Transaction,
    UserAccount,
};

/// Durable storage and atomic mutation of user accounts
///
/// Every mutation is atomic at the storage layer: an append or removal
/// either fully applies or leaves the account exactly as it was. Entry
/// sequences are never read-modified-written in application code.
pub trait AccountStore: Send + Sync {
    // === Lookups ===

    /// Get an account with both entry sequences
    fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>>;

    /// Get an account by exact (case-sensitive) email
    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    // === Mutations ===

    /// Create an account
    ///
    /// Fails with [`Error::DuplicateEmail`] when the email is taken, including
    /// when a concurrent insert wins the race after a caller's pre-check.
    fn insert(&self, account: NewAccount) -> Result<UserAccount>;

    /// Append an entry to one collection, assigning its id
    fn append_entry(
        &self,
        account_id: AccountId,
        collection: Collection,
        entry: NewEntry,
    ) -> Result<UserAccount>;

    /// Remove an entry from one collection
    ///
    /// An entry id that is not in the collection is a no-op, not an error.
    fn remove_entry(
        &self,
        account_id: AccountId,
        collection: Collection,
        entry_id: EntryId,
    ) -> Result<UserAccount>;

    // === Reads without materializing the account ===

    /// Entries of one collection in insertion order
    fn list_entries(&self, account_id: AccountId, collection: Collection) -> Result<Vec<Entry>>;

    /// Entries of both collections with their insertion positions
    fn list_transactions(&self, account_id: AccountId) -> Result<Vec<(i64, Transaction)>>;

    /// Count/sum/max of one collection, or `None` if the account does not exist
    fn aggregate(
        &self,
        account_id: AccountId,
        collection: Collection,
    ) -> Result<Option<CollectionStats>>;

    // === Status ===

    fn count_accounts(&self) -> Result<i64>;

    fn count_entries(&self) -> Result<i64>;

    /// Like [`AccountStore::find_by_id`] but a missing account is an error
    fn get(&self, id: AccountId) -> Result<UserAccount> {
        self.find_by_id(id)?
            .ok_or_else(|| Error::account_not_found(id.to_string()))
    }
}
