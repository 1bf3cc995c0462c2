//! Account service - registration and authentication

use std::sync::Arc;

use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{NewAccount, UserAccount};
use crate::ports::AccountStore;
use crate::services::password::PasswordHasher;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Non-empty local part, `@`, non-empty domain, no whitespace
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+$";

/// Compile failures are `Config` errors, never `Validation`
fn email_regex() -> Result<Regex> {
    Regex::new(EMAIL_PATTERN)
        .map_err(|e| Error::Config(format!("invalid email pattern: {}", e)))
}

/// Registration and credential checks
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Create an account
    ///
    /// The email lookup here only gives a fast failure. A registration that
    /// races past it still fails on the store's unique constraint.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<UserAccount> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(Error::validation("name cannot be empty"));
        }
        if !email_regex()?.is_match(email) {
            return Err(Error::validation("email is not a valid address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.store.find_by_email(email)?.is_some() {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        self.store.insert(NewAccount::new(name, email, password_hash))
    }

    /// Check credentials and return the account
    ///
    /// Unknown email and wrong password fail with the same error.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<UserAccount> {
        match self.store.find_by_email(email.trim())? {
            Some(account) if self.hasher.verify(password, &account.password_hash) => Ok(account),
            Some(_) => Err(Error::InvalidCredentials),
            None => {
                self.hasher.verify_dummy(password);
                Err(Error::InvalidCredentials)
            }
        }
    }
}
