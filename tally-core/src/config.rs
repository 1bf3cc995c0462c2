//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "database": "tally.duckdb",
//!   "passwordHashing": { "memoryCost": 19456, "timeCost": 2, "parallelism": 1 },
//!   "eventLog": true
//! }
//! ```
//! A missing or malformed file falls back to defaults. Unknown keys are
//! ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_DATABASE: &str = "tally.duckdb";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    password_hashing: Option<PasswordHashing>,
    #[serde(default)]
    event_log: Option<bool>,
}

/// Argon2id cost parameters for account passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordHashing {
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl PasswordHashing {
    /// Minimal cost, for tests only
    pub fn for_tests() -> Self {
        Self {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Tally configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database file name, relative to the data directory
    pub database: String,
    pub password_hashing: PasswordHashing,
    pub event_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            password_hashing: PasswordHashing::default(),
            event_log: true,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The event log can be toggled with the TALLY_EVENT_LOG environment
    /// variable, which wins over the settings file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(&data_dir.join(SETTINGS_FILE))?;

        let event_log = match std::env::var("TALLY_EVENT_LOG").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.event_log.unwrap_or(true),
        };

        let database = raw
            .database
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self {
            database,
            password_hashing: raw.password_hashing.unwrap_or_default(),
            event_log,
        })
    }

    /// Full path of the account database
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database)
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}
