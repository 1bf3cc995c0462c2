//! Tally CLI - income and expense tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tally_core::{AccountId, Collection, EntryId};

mod commands;
mod output;

use commands::{add, list, login, logs, recent, register, remove, status, summary};

/// Tally - income and expense tracking in your terminal
#[derive(Parser)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Email address (used to log in)
        #[arg(long)]
        email: String,
        /// Password (prompted for if omitted, or read from piped stdin)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check credentials and show the account
    Login {
        #[arg(long)]
        email: String,
        /// Password (prompted for if omitted, or read from piped stdin)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record an income or expense entry
    Add {
        /// income or expense
        collection: Collection,
        /// Amount; a negative value books a refund or correction
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        category: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, env = "TALLY_ACCOUNT")]
        account: AccountId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove an entry by id
    Remove {
        /// income or expense
        collection: Collection,
        entry_id: EntryId,
        #[arg(long, env = "TALLY_ACCOUNT")]
        account: AccountId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the entries of one collection in insertion order
    List {
        /// income or expense
        collection: Collection,
        #[arg(long, env = "TALLY_ACCOUNT")]
        account: AccountId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the latest transactions across income and expenses
    Recent {
        #[arg(long, env = "TALLY_ACCOUNT")]
        account: AccountId,
        /// Number of transactions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show totals, maxima and net income
    Summary {
        #[arg(long, env = "TALLY_ACCOUNT")]
        account: AccountId,
        /// Which figures to show
        #[arg(long, value_enum, default_value = "all")]
        view: summary::SummaryView,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { name, email, password, json } => {
            register::run(&name, &email, password, json)
        }
        Commands::Login { email, password, json } => login::run(&email, password, json),
        Commands::Add { collection, amount, category, date, description, account, json } => {
            add::run(account, collection, amount, category, date, description, json)
        }
        Commands::Remove { collection, entry_id, account, json } => {
            remove::run(account, collection, entry_id, json)
        }
        Commands::List { collection, account, json } => list::run(account, collection, json),
        Commands::Recent { account, limit, json } => recent::run(account, limit, json),
        Commands::Summary { account, view, json } => summary::run(account, view, json),
        Commands::Status { json } => status::run(json),
        Commands::Logs { command } => logs::run(command),
    }
}
