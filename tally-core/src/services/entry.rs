//! Entry service - validated append/remove/list over an account's collections

use std::sync::Arc;

use crate::api::NewEntryRequest;
use crate::domain::result::Result;
use crate::domain::transaction::latest_first;
use crate::domain::{AccountId, Collection, Entry, EntryId, Transaction, UserAccount};
use crate::ports::AccountStore;

pub struct EntryService {
    store: Arc<dyn AccountStore>,
}

impl EntryService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Validate a request and append it to one collection
    pub fn add(
        &self,
        account_id: AccountId,
        collection: Collection,
        request: NewEntryRequest,
    ) -> Result<UserAccount> {
        let entry = request.into_new_entry()?;
        self.store.append_entry(account_id, collection, entry)
    }

    /// Remove an entry; an unknown entry id leaves the collection unchanged
    pub fn remove(
        &self,
        account_id: AccountId,
        collection: Collection,
        entry_id: EntryId,
    ) -> Result<UserAccount> {
        self.store.remove_entry(account_id, collection, entry_id)
    }

    pub fn list(&self, account_id: AccountId, collection: Collection) -> Result<Vec<Entry>> {
        self.store.list_entries(account_id, collection)
    }

    /// Latest transactions across both collections, newest first
    pub fn recent(&self, account_id: AccountId, limit: usize) -> Result<Vec<Transaction>> {
        let rows = self.store.list_transactions(account_id)?;
        Ok(latest_first(rows, limit))
    }
}
