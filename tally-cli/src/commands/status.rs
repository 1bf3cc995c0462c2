//! Status command - show database status

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output::format_size;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;
    ctx.close()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Tally Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Entries", &status.total_entries.to_string()]);
    table.add_row(vec!["Database size", &format_size(status.database_size)]);

    println!("{}", table);

    if let Some(path) = &status.database_path {
        println!();
        println!("Database: {}", path.dimmed());
    }

    Ok(())
}
