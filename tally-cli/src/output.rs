//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use rust_decimal::Decimal;
use tally_core::{Collection, Entry};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning to stderr
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount with at least two decimals, never rounding
pub fn format_amount(amount: Decimal) -> String {
    let amount = amount.normalize();
    if amount.scale() > 2 {
        amount.to_string()
    } else {
        format!("{:.2}", amount)
    }
}

/// Amount cell colored by collection (green income, red expense)
pub fn amount_cell(amount: Decimal, collection: Collection) -> Cell {
    let color = match collection {
        Collection::Income => Color::Green,
        Collection::Expense => Color::Red,
    };
    Cell::new(format_amount(amount)).fg(color)
}

/// Table of entries from one collection
pub fn entries_table(entries: &[Entry], collection: Collection) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Date", "Category", "Amount", "Description", "ID"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.date.format("%Y-%m-%d")),
            Cell::new(&entry.category),
            amount_cell(entry.amount, collection),
            Cell::new(&entry.description),
            Cell::new(entry.id),
        ]);
    }
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
