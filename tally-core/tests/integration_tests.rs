//! Integration tests for tally-core services
//!
//! These tests run every service against a real DuckDB file in a temporary
//! data directory, the same way the CLI uses them.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::path::Path;

use rust_decimal::Decimal;
use tempfile::TempDir;

use tally_core::api::NewEntryRequest;
use tally_core::config::SETTINGS_FILE;
use tally_core::{AccountId, Collection, EntryId, Error, OperationResult, TallyContext};

// ============================================================================
// Test Helpers
// ============================================================================

/// Open a context in a fresh data directory with cheap password hashing
fn open_context(dir: &Path) -> TallyContext {
    std::fs::write(
        dir.join(SETTINGS_FILE),
        r#"{"passwordHashing": {"memoryCost": 8, "timeCost": 1, "parallelism": 1}}"#,
    )
    .unwrap();
    TallyContext::open(dir).expect("Failed to open context")
}

fn register(ctx: &TallyContext, email: &str) -> AccountId {
    ctx.account_service
        .register("Test User", email, "correct-horse-battery")
        .expect("Failed to register")
        .id
}

fn add(ctx: &TallyContext, id: AccountId, collection: Collection, amount: i64, category: &str) {
    ctx.entry_service
        .add(id, collection, NewEntryRequest::new(Decimal::new(amount, 0), category))
        .expect("Failed to add entry");
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_income_sum_and_max() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "sum@example.com");

    add(&ctx, id, Collection::Income, 500, "Salary");
    add(&ctx, id, Collection::Income, 200, "Gifts");

    let agg = &ctx.aggregation_service;
    assert_eq!(agg.sum_of(id, Collection::Income).unwrap(), Decimal::new(700, 0));
    assert_eq!(agg.max_of(id, Collection::Income).unwrap(), Decimal::new(500, 0));
}

#[test]
fn test_net_income_scenario() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "net@example.com");

    add(&ctx, id, Collection::Expense, 300, "Rent");
    add(&ctx, id, Collection::Income, 1000, "Salary");

    assert_eq!(ctx.aggregation_service.net_income(id).unwrap(), Decimal::new(700, 0));
}

#[test]
fn test_net_income_identity() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "identity@example.com");

    let amounts = [
        ("12.34", Collection::Income),
        ("0.99", Collection::Expense),
        ("1500", Collection::Income),
        ("2000.01", Collection::Expense),
    ];
    for (amount, collection) in amounts {
        let request = NewEntryRequest::from_json(&format!(
            r#"{{"amount": "{}", "category": "Misc"}}"#,
            amount
        ))
        .unwrap();
        ctx.entry_service.add(id, collection, request).unwrap();
    }

    let agg = &ctx.aggregation_service;
    let income = agg.sum_of(id, Collection::Income).unwrap();
    let expense = agg.sum_of(id, Collection::Expense).unwrap();
    assert_eq!(income - expense, agg.net_income(id).unwrap());
    assert_eq!(agg.net_income(id).unwrap(), Decimal::new(-48866, 2));

    let totals = agg.totals(id).unwrap();
    assert_eq!(totals.total_income, income);
    assert_eq!(totals.total_expense, expense);
}

#[test]
fn test_refunds_and_sub_cent_amounts() {
    let dir = TempDir::new().unwrap();
    let id = {
        let ctx = open_context(dir.path());
        let id = register(&ctx, "refund@example.com");
        add(&ctx, id, Collection::Income, 100, "Salary");
        add(&ctx, id, Collection::Expense, 40, "Food");
        for body in [
            r#"{"amount": -5, "category": "Refund"}"#,
            r#"{"amount": 0.125, "category": "FX fee"}"#,
        ] {
            let request = NewEntryRequest::from_json(body).unwrap();
            ctx.entry_service.add(id, Collection::Expense, request).unwrap();
        }
        ctx.close().unwrap();
        id
    };

    let ctx = TallyContext::open(dir.path()).unwrap();
    let expenses = ctx.entry_service.list(id, Collection::Expense).unwrap();
    assert_eq!(expenses[1].amount, Decimal::new(-5, 0));
    assert_eq!(expenses[2].amount, Decimal::new(125, 3));

    let agg = &ctx.aggregation_service;
    assert_eq!(agg.sum_of(id, Collection::Expense).unwrap(), Decimal::new(35125, 3));
    assert_eq!(agg.max_of(id, Collection::Expense).unwrap(), Decimal::new(40, 0));
    assert_eq!(agg.net_income(id).unwrap(), Decimal::new(64875, 3));
}

#[test]
fn test_empty_account_aggregates_to_zero() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "empty@example.com");

    let agg = &ctx.aggregation_service;
    assert_eq!(agg.max_of(id, Collection::Income).unwrap(), Decimal::ZERO);
    assert_eq!(agg.sum_of(id, Collection::Income).unwrap(), Decimal::ZERO);

    let max = agg.max_income_and_expense(id).unwrap();
    assert_eq!(max.max_income, Decimal::ZERO);
    assert_eq!(max.max_expense, Decimal::ZERO);
}

#[test]
fn test_aggregation_over_missing_account() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());

    let err = ctx
        .aggregation_service
        .max_income_and_expense(AccountId::new())
        .unwrap_err();
    assert!(matches!(err, Error::AccountNotFound(_)));
}

// ============================================================================
// Entry lifecycle
// ============================================================================

#[test]
fn test_append_then_remove_restores_collection() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "roundtrip@example.com");
    add(&ctx, id, Collection::Expense, 40, "Food");

    let before = ctx.entry_service.list(id, Collection::Expense).unwrap();

    let updated = ctx
        .entry_service
        .add(id, Collection::Expense, NewEntryRequest::new(Decimal::new(60, 0), "Travel"))
        .unwrap();
    let new_id = updated.expenses.last().unwrap().id;
    assert_eq!(updated.expenses.len(), before.len() + 1);

    let restored = ctx.entry_service.remove(id, Collection::Expense, new_id).unwrap();
    assert_eq!(restored.expenses, before);
}

#[test]
fn test_remove_income_entry_shrinks_list() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "shrink@example.com");
    add(&ctx, id, Collection::Income, 500, "Salary");
    add(&ctx, id, Collection::Income, 200, "Gifts");

    let before = ctx.entry_service.list(id, Collection::Income).unwrap();
    let target = before[0].id;

    ctx.entry_service.remove(id, Collection::Income, target).unwrap();

    let after = ctx.entry_service.list(id, Collection::Income).unwrap();
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|e| e.id != target));
    assert_eq!(after[0].category, "Gifts");
}

#[test]
fn test_remove_unknown_entry_is_noop() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "noop@example.com");
    add(&ctx, id, Collection::Income, 500, "Salary");

    let before = ctx.entry_service.list(id, Collection::Income).unwrap();
    let account = ctx
        .entry_service
        .remove(id, Collection::Income, EntryId::new())
        .unwrap();

    assert_eq!(account.income, before);
}

#[test]
fn test_remove_on_missing_account() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());

    let err = ctx
        .entry_service
        .remove(AccountId::new(), Collection::Income, EntryId::new())
        .unwrap_err();
    assert!(matches!(err, Error::AccountNotFound(_)));
}

#[test]
fn test_malformed_identifiers() {
    assert!(matches!(
        AccountId::parse("not-a-uuid").unwrap_err(),
        Error::InvalidIdentifier(_)
    ));
    assert!(matches!(EntryId::parse("").unwrap_err(), Error::InvalidIdentifier(_)));
}

// ============================================================================
// Accounts
// ============================================================================

#[test]
fn test_duplicate_registration_leaves_one_account() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    register(&ctx, "dup@example.com");

    let err = ctx
        .account_service
        .register("Someone Else", "dup@example.com", "another-password")
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateEmail(_)));

    let status = ctx.status_service.get_status().unwrap();
    assert_eq!(status.total_accounts, 1);
}

#[test]
fn test_credential_failures_are_indistinguishable() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    register(&ctx, "creds@example.com");

    let wrong_password = ctx
        .account_service
        .authenticate("creds@example.com", "not-the-password")
        .unwrap_err();
    let unknown_email = ctx
        .account_service
        .authenticate("nobody@example.com", "correct-horse-battery")
        .unwrap_err();

    let a: OperationResult<()> = OperationResult::fail(&wrong_password);
    let b: OperationResult<()> = OperationResult::fail(&unknown_email);
    assert_eq!(a.error, b.error);
    assert_eq!(a.error_kind.as_deref(), Some("invalid_credentials"));
    assert_eq!(a.error_kind, b.error_kind);
}

#[test]
fn test_login_returns_full_account_view() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "view@example.com");
    add(&ctx, id, Collection::Income, 10, "Salary");

    let account = ctx
        .account_service
        .authenticate("view@example.com", "correct-horse-battery")
        .unwrap();
    assert_eq!(account.id, id);
    assert_eq!(account.income.len(), 1);

    let json = serde_json::to_value(&account).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("income").is_some());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_data_survives_close_and_reopen() {
    let dir = TempDir::new().unwrap();

    let id = {
        let ctx = open_context(dir.path());
        let id = register(&ctx, "persist@example.com");
        add(&ctx, id, Collection::Income, 500, "Salary");
        add(&ctx, id, Collection::Expense, 120, "Utilities");
        ctx.close().unwrap();
        id
    };

    let ctx = TallyContext::open(dir.path()).unwrap();
    let summary = ctx.aggregation_service.summary(id).unwrap();
    assert_eq!(summary.income_count, 1);
    assert_eq!(summary.expense_count, 1);
    assert_eq!(summary.net_income, Decimal::new(380, 0));

    let account = ctx
        .account_service
        .authenticate("persist@example.com", "correct-horse-battery")
        .unwrap();
    assert_eq!(account.expenses[0].category, "Utilities");
}

#[test]
fn test_recent_spans_both_collections() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(dir.path());
    let id = register(&ctx, "recent@example.com");

    for (collection, date, category) in [
        (Collection::Income, "2024-01-31", "Salary"),
        (Collection::Expense, "2024-02-01", "Rent"),
        (Collection::Expense, "2024-01-15", "Food"),
    ] {
        ctx.entry_service
            .add(
                id,
                collection,
                NewEntryRequest::new(Decimal::new(100, 0), category).with_date(date),
            )
            .unwrap();
    }

    let recent = ctx.entry_service.recent(id, 10).unwrap();
    let categories: Vec<_> = recent.iter().map(|t| t.entry.category.as_str()).collect();
    assert_eq!(categories, vec!["Rent", "Salary", "Food"]);
}
