//! Aggregate results computed over an account's collections

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-side reduction of one collection
///
/// `sum` and `max` are zero when the collection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    pub count: i64,
    pub sum: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxIncomeAndExpense {
    pub max_income: Decimal,
    pub max_expense: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetIncome {
    pub net_income: Decimal,
}

/// Everything the dashboard shows at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub income_count: i64,
    pub expense_count: i64,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub max_income: Decimal,
    pub max_expense: Decimal,
    pub net_income: Decimal,
}

impl Summary {
    pub fn from_stats(income: CollectionStats, expense: CollectionStats) -> Self {
        Self {
            income_count: income.count,
            expense_count: expense.count,
            total_income: income.sum,
            total_expense: expense.sum,
            max_income: income.max,
            max_expense: expense.max,
            net_income: income.sum - expense.sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_may_be_negative() {
        let totals = Totals {
            total_income: Decimal::new(100, 0),
            total_expense: Decimal::new(25050, 2),
        };
        assert_eq!(totals.net(), Decimal::new(-15050, 2));
    }

    #[test]
    fn test_summary_from_stats() {
        let income = CollectionStats {
            count: 2,
            sum: Decimal::new(700, 0),
            max: Decimal::new(500, 0),
        };
        let summary = Summary::from_stats(income, CollectionStats::default());
        assert_eq!(summary.net_income, Decimal::new(700, 0));
        assert_eq!(summary.max_expense, Decimal::ZERO);
        assert_eq!(summary.expense_count, 0);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(MaxIncomeAndExpense {
            max_income: Decimal::ONE,
            max_expense: Decimal::ZERO,
        })
        .unwrap();
        assert!(json.get("maxIncome").is_some());
        assert!(json.get("maxExpense").is_some());
    }
}
