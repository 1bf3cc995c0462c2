//! Add command - record an income or expense entry

use anyhow::Result;
use rust_decimal::Decimal;
use tally_core::{AccountId, Collection, NewEntryRequest};

use super::{finish, get_context};
use crate::output;

pub fn run(
    account: AccountId,
    collection: Collection,
    amount: Decimal,
    category: String,
    date: Option<String>,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let request = NewEntryRequest {
        amount,
        category,
        date,
        description,
    };
    let result = ctx.entry_service.add(account, collection, request);

    finish(ctx, "add", Some(collection), result, json, |account| {
        // The appended entry is always last in its collection
        if let Some(entry) = account.entries(collection).last() {
            output::success(&format!(
                "Added {} {} ({})",
                collection,
                output::format_amount(entry.amount),
                entry.category
            ));
            println!("  Entry ID: {}", entry.id);
        }
    })
}
