//! Password hashing - Argon2id PHC strings
//!
//! Each hash embeds its own random salt and cost parameters, so verifying
//! needs nothing but the stored string.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;

use crate::config::PasswordHashing;
use crate::domain::result::{Error, Result};

/// Salt length in bytes
const SALT_LEN: usize = 16;

const DUMMY_PASSWORD: &str = "tally-dummy-password";

/// Hashes and verifies account passwords
pub struct PasswordHasher {
    params: PasswordHashing,
    // Hash checked against when an email is unknown, so both paths do the
    // same amount of work
    dummy_hash: OnceLock<String>,
    #[cfg(test)]
    argon2_runs: AtomicUsize,
}

impl PasswordHasher {
    pub fn new(params: PasswordHashing) -> Self {
        Self {
            params,
            dummy_hash: OnceLock::new(),
            #[cfg(test)]
            argon2_runs: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    fn count_run(&self) {
        self.argon2_runs.fetch_add(1, Ordering::SeqCst);
    }

    #[cfg(not(test))]
    fn count_run(&self) {}

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| Error::Config(format!("Invalid password hashing parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt_bytes: [u8; SALT_LEN] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| Error::storage(format!("Failed to encode salt: {}", e)))?;

        self.count_run();
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::storage(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored hash
    ///
    /// A malformed stored hash verifies as false rather than erroring.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        self.count_run();
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Burn the same work as a real verification, always failing
    ///
    /// The first call builds the dummy hash instead of verifying against it;
    /// hashing costs one Argon2 run, like a verification.
    pub fn verify_dummy(&self, password: &str) -> bool {
        match self.dummy_hash.get() {
            Some(dummy) => {
                self.verify(password, dummy);
            }
            None => {
                if let Ok(hash) = self.hash(DUMMY_PASSWORD) {
                    // A concurrent first call may have won; either hash will do
                    let _ = self.dummy_hash.set(hash);
                }
            }
        }
        false
    }
}
