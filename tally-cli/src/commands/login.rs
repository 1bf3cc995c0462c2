//! Login command - check credentials and show the account

use anyhow::Result;
use colored::Colorize;

use super::{finish, get_context, read_password};
use crate::output;

pub fn run(email: &str, password: Option<String>, json: bool) -> Result<()> {
    let password = read_password(password, false)?;
    let ctx = get_context()?;

    let result = ctx.account_service.authenticate(email, &password);

    finish(ctx, "login", None, result, json, |account| {
        output::success(&format!("Logged in as {}", account.name));
        println!("  Account ID: {}", account.id.to_string().bold());
        println!("  Income entries: {}", account.income.len());
        println!("  Expense entries: {}", account.expenses.len());
    })
}
