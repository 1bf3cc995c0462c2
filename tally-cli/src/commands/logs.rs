//! Logs command - inspect and prune the event log

use std::path::Path;

use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::Subcommand;
use colored::Colorize;
use tally_core::services::logging::now_ms;
use tally_core::{EntryPoint, LogEntry, LoggingService};

use super::get_data_dir;
use crate::output;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the most recent events, newest first
    List {
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only failed operations
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete events older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let log = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List { limit, errors, json } => {
            let entries = if errors {
                log.get_errors(limit)?
            } else {
                log.get_recent(limit)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                output::info("The event log is empty.");
            } else {
                print_entries(&entries, log.db_path());
            }
        }
        LogsCommands::Clear { older_than_days, json } => {
            let cutoff = now_ms() - i64::from(older_than_days) * MS_PER_DAY;
            let deleted = log.delete_before(cutoff)?;
            let remaining = log.count()?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({"deleted": deleted, "remaining": remaining})
                );
            } else {
                output::success(&format!(
                    "Deleted {} events older than {} days, {} left",
                    deleted, older_than_days, remaining
                ));
            }
        }
    }

    Ok(())
}

fn print_entries(entries: &[LogEntry], db_path: &Path) {
    let mut table = output::create_table();
    table.set_header(vec!["When", "Event", "Collection", "Error"]);
    for entry in entries {
        let when = Local
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let error = if entry.is_error() {
            entry.error_kind.as_deref().unwrap_or("error").red().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            when,
            entry.event.clone(),
            entry.collection.clone().unwrap_or_default(),
            error,
        ]);
    }
    println!("{}", table);
    println!("{}", format!("Log file: {}", db_path.display()).dimmed());
}
