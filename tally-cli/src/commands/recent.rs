//! Recent command - latest transactions across both collections

use anyhow::Result;
use comfy_table::Cell;
use tally_core::AccountId;

use super::{finish, get_context};
use crate::output;

pub fn run(account: AccountId, limit: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.entry_service.recent(account, limit);

    finish(ctx, "recent", None, result, json, |transactions| {
        if transactions.is_empty() {
            output::info("No transactions yet.");
            return;
        }

        let mut table = output::create_table();
        table.set_header(vec!["Date", "Type", "Category", "Amount", "Description"]);
        for tx in transactions {
            table.add_row(vec![
                Cell::new(tx.entry.date.format("%Y-%m-%d")),
                Cell::new(tx.collection),
                Cell::new(&tx.entry.category),
                output::amount_cell(tx.entry.amount, tx.collection),
                Cell::new(&tx.entry.description),
            ]);
        }
        println!("{}", table);
    })
}
