//! Register command - create a new account

use anyhow::Result;
use colored::Colorize;
use tally_core::RegisterResponse;

use super::{finish, get_context, read_password};
use crate::output;

pub fn run(name: &str, email: &str, password: Option<String>, json: bool) -> Result<()> {
    let password = read_password(password, true)?;
    let ctx = get_context()?;

    let result = ctx
        .account_service
        .register(name, email, &password)
        .map(|account| RegisterResponse::from(&account));

    finish(ctx, "register", None, result, json, |response| {
        output::success(&format!("Registered {}", response.email));
        println!("  Account ID: {}", response.account_id.to_string().bold());
        println!();
        println!(
            "{}",
            "Pass it with --account, or export TALLY_ACCOUNT to use it by default.".dimmed()
        );
    })
}
