//! Remove command - delete an entry by id

use anyhow::Result;
use colored::Colorize;
use tally_core::{AccountId, Collection, EntryId};

use super::{finish, get_context};
use crate::output;

pub fn run(
    account: AccountId,
    collection: Collection,
    entry_id: EntryId,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let before = ctx.entry_service.list(account, collection).map(|e| e.len());
    let result = ctx.entry_service.remove(account, collection, entry_id);

    finish(ctx, "remove", Some(collection), result, json, |account| {
        let remaining = account.entries(collection).len();
        if matches!(before, Ok(count) if count > remaining) {
            output::success(&format!("Removed {} entry {}", collection, entry_id));
        } else {
            println!(
                "{}",
                format!("No {} entry with id {}, nothing removed", collection, entry_id).yellow()
            );
        }
    })
}
