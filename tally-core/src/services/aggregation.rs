//! Aggregation service - sums, maxima and net income over an account
//!
//! All reductions run inside the store; entries are never loaded here.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AccountId, Collection, CollectionStats, MaxIncomeAndExpense, Summary, Totals,
};
use crate::ports::AccountStore;

pub struct AggregationService {
    store: Arc<dyn AccountStore>,
}

impl AggregationService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    fn stats(&self, account_id: AccountId, collection: Collection) -> Result<CollectionStats> {
        self.store
            .aggregate(account_id, collection)?
            .ok_or_else(|| Error::account_not_found(account_id.to_string()))
    }

    /// Largest amount in a collection, 0 when empty
    pub fn max_of(&self, account_id: AccountId, collection: Collection) -> Result<Decimal> {
        Ok(self.stats(account_id, collection)?.max)
    }

    /// Sum of a collection, 0 when empty
    pub fn sum_of(&self, account_id: AccountId, collection: Collection) -> Result<Decimal> {
        Ok(self.stats(account_id, collection)?.sum)
    }

    /// Total income minus total expenses (may be negative)
    pub fn net_income(&self, account_id: AccountId) -> Result<Decimal> {
        Ok(self.totals(account_id)?.net())
    }

    pub fn max_income_and_expense(&self, account_id: AccountId) -> Result<MaxIncomeAndExpense> {
        Ok(MaxIncomeAndExpense {
            max_income: self.max_of(account_id, Collection::Income)?,
            max_expense: self.max_of(account_id, Collection::Expense)?,
        })
    }

    pub fn totals(&self, account_id: AccountId) -> Result<Totals> {
        Ok(Totals {
            total_income: self.sum_of(account_id, Collection::Income)?,
            total_expense: self.sum_of(account_id, Collection::Expense)?,
        })
    }

    /// Totals, maxima, net and counts in one view
    pub fn summary(&self, account_id: AccountId) -> Result<Summary> {
        let income = self.stats(account_id, Collection::Income)?;
        let expense = self.stats(account_id, Collection::Expense)?;
        Ok(Summary::from_stats(income, expense))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbAccountStore;
    use crate::domain::{NewAccount, NewEntry};

    fn setup() -> (Arc<DuckDbAccountStore>, AggregationService, AccountId) {
        let store = Arc::new(DuckDbAccountStore::open_in_memory().unwrap());
        let account = store
            .insert(NewAccount::new("Ada", "ada@example.com", "hash"))
            .unwrap();
        let service = AggregationService::new(store.clone());
        (store, service, account.id)
    }

    #[test]
    fn test_empty_collections_are_zero() {
        let (_, service, id) = setup();
        assert_eq!(service.max_of(id, Collection::Income).unwrap(), Decimal::ZERO);
        assert_eq!(service.sum_of(id, Collection::Income).unwrap(), Decimal::ZERO);
        assert_eq!(service.net_income(id).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_sum_and_max() {
        let (store, service, id) = setup();
        store
            .append_entry(id, Collection::Income, NewEntry::new(Decimal::new(500, 0), "Salary"))
            .unwrap();
        store
            .append_entry(id, Collection::Income, NewEntry::new(Decimal::new(200, 0), "Gifts"))
            .unwrap();

        assert_eq!(service.sum_of(id, Collection::Income).unwrap(), Decimal::new(700, 0));
        assert_eq!(service.max_of(id, Collection::Income).unwrap(), Decimal::new(500, 0));

        let max = service.max_income_and_expense(id).unwrap();
        assert_eq!(max.max_income, Decimal::new(500, 0));
        assert_eq!(max.max_expense, Decimal::ZERO);
    }

    #[test]
    fn test_net_income_may_be_negative() {
        let (store, service, id) = setup();
        store
            .append_entry(id, Collection::Income, NewEntry::new(Decimal::new(100, 0), "Salary"))
            .unwrap();
        store
            .append_entry(id, Collection::Expense, NewEntry::new(Decimal::new(12550, 2), "Rent"))
            .unwrap();

        assert_eq!(service.net_income(id).unwrap(), Decimal::new(-2550, 2));
        let totals = service.totals(id).unwrap();
        assert_eq!(totals.total_expense, Decimal::new(12550, 2));
    }

    #[test]
    fn test_summary() {
        let (store, service, id) = setup();
        store
            .append_entry(id, Collection::Expense, NewEntry::new(Decimal::new(300, 0), "Rent"))
            .unwrap();
        store
            .append_entry(id, Collection::Income, NewEntry::new(Decimal::new(1000, 0), "Salary"))
            .unwrap();

        let summary = service.summary(id).unwrap();
        assert_eq!(summary.income_count, 1);
        assert_eq!(summary.expense_count, 1);
        assert_eq!(summary.net_income, Decimal::new(700, 0));
    }

    #[test]
    fn test_missing_account() {
        let (_, service, _) = setup();
        let missing = AccountId::new();

        assert_eq!(
            service.sum_of(missing, Collection::Expense).unwrap_err().kind(),
            "account_not_found"
        );
        assert_eq!(service.totals(missing).unwrap_err().kind(), "account_not_found");
        assert_eq!(service.summary(missing).unwrap_err().kind(), "account_not_found");
    }
}
