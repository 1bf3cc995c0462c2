//! Transaction view: an entry tagged with the collection it lives in

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entry::Entry;

/// One row of the merged income/expense history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub collection: Collection,
    #[serde(flatten)]
    pub entry: Entry,
}

impl Transaction {
    pub fn new(collection: Collection, entry: Entry) -> Self {
        Self { collection, entry }
    }

    pub fn is_income(&self) -> bool {
        self.collection == Collection::Income
    }
}

/// Order store rows newest-first
///
/// Rows are `(position, transaction)` pairs as returned by the store. Sorted
/// by date descending; within one date, later insertions come first.
pub fn latest_first(mut rows: Vec<(i64, Transaction)>, limit: usize) -> Vec<Transaction> {
    rows.sort_by(|(pos_a, a), (pos_b, b)| {
        b.entry
            .date
            .cmp(&a.entry.date)
            .then_with(|| pos_b.cmp(pos_a))
    });
    rows.into_iter().take(limit).map(|(_, tx)| tx).collect()
}
