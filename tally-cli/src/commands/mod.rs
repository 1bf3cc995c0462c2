//! CLI command implementations

pub mod add;
pub mod list;
pub mod login;
pub mod logs;
pub mod recent;
pub mod register;
pub mod remove;
pub mod status;
pub mod summary;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::Password;
use serde::Serialize;
use tally_core::{Collection, EntryPoint, LogEvent, LoggingService, OperationResult, TallyContext};

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging is disabled or fails to initialize (shouldn't
/// block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    let config = tally_core::config::Config::load(&data_dir).ok()?;
    if !config.event_log {
        return None;
    }
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from TALLY_DIR or the default ~/.tally
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".tally"))
        .context("Could not find home directory, set TALLY_DIR")
}

/// Open the tally context for the data directory
pub fn get_context() -> Result<TallyContext> {
    let data_dir = get_data_dir()?;
    TallyContext::open(&data_dir)
        .with_context(|| format!("Failed to open tally data in {}", data_dir.display()))
}

/// Get a password from the flag, TALLY_PASSWORD, piped stdin, or a prompt
pub fn read_password(flag: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = flag {
        return Ok(p);
    }

    if let Ok(p) = std::env::var("TALLY_PASSWORD") {
        return Ok(p);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .context("Failed to read password from stdin")?;
        return Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string());
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

/// Finish a command: log the outcome, close the store, then print JSON or
/// human output
///
/// A failed close is logged and reported as a warning; it never replaces
/// the outcome of an operation that already committed. Failures are printed
/// as an `OperationResult` envelope in JSON mode and always returned so the
/// process exits non-zero.
pub fn finish<T: Serialize>(
    ctx: TallyContext,
    command: &str,
    collection: Option<Collection>,
    result: tally_core::Result<T>,
    json: bool,
    render: impl FnOnce(&T),
) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, outcome_event(command, collection, &result));

    let closed = ctx.close();
    if let Some(event) = close_failure_event(command, &closed) {
        log_event(&logger, event);
    }
    if let Err(e) = closed {
        output::warning(&format!("Warning: could not flush the database: {}", e));
    }

    match result {
        Ok(data) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&data))?);
            } else {
                render(&data);
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::<()>::fail(&e))?);
            }
            Err(e.into())
        }
    }
}

fn outcome_event<T>(
    command: &str,
    collection: Option<Collection>,
    result: &tally_core::Result<T>,
) -> LogEvent {
    let mut event = match result {
        Ok(_) => LogEvent::new(format!("{}_completed", command)),
        Err(e) => LogEvent::new(format!("{}_failed", command)).with_error(e),
    }
    .with_command(command);
    if let Some(c) = collection {
        event = event.with_collection(c);
    }
    event
}

fn close_failure_event(command: &str, closed: &tally_core::Result<()>) -> Option<LogEvent> {
    closed
        .as_ref()
        .err()
        .map(|e| LogEvent::new("close_failed").with_command(command).with_error(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Error;

    #[test]
    fn test_outcome_event_names() {
        let ok: tally_core::Result<()> = Ok(());
        let event = outcome_event("add", Some(Collection::Expense), &ok);
        assert_eq!(event.event, "add_completed");
        assert_eq!(event.collection, Some(Collection::Expense));
        assert!(event.error_kind.is_none());

        let failed: tally_core::Result<()> = Err(Error::InvalidCredentials);
        let event = outcome_event("login", None, &failed);
        assert_eq!(event.event, "login_failed");
        assert_eq!(event.command.as_deref(), Some("login"));
        assert_eq!(event.error_kind.as_deref(), Some("invalid_credentials"));
    }

    #[test]
    fn test_close_failure_is_a_separate_event() {
        assert!(close_failure_event("add", &Ok(())).is_none());

        let closed = Err(Error::storage("checkpoint failed"));
        let event = close_failure_event("add", &closed).unwrap();
        assert_eq!(event.event, "close_failed");
        assert_eq!(event.command.as_deref(), Some("add"));
        assert_eq!(event.error_kind.as_deref(), Some("storage_unavailable"));
    }
}
