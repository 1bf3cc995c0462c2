//! List command - entries of one collection in insertion order

use anyhow::Result;
use tally_core::{AccountId, Collection};

use super::{finish, get_context};
use crate::output;

pub fn run(account: AccountId, collection: Collection, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.entry_service.list(account, collection);

    finish(ctx, "list", Some(collection), result, json, |entries| {
        if entries.is_empty() {
            output::info(&format!("No {} entries yet.", collection));
            return;
        }
        println!("{}", output::entries_table(entries, collection));
    })
}
