//! DuckDB account store implementation

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AccountId, Collection, CollectionStats, Entry, EntryId, NewAccount, NewEntry, Transaction,
    UserAccount,
};
use crate::ports::AccountStore;
use crate::schema::{self, SchemaVersion, ACCOUNT_SCHEMA};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const ACCOUNT_COLUMNS: &str = "account_id, name, email, password_hash,
                               created_at::VARCHAR, updated_at::VARCHAR";

const ENTRY_COLUMNS: &str = "position, collection, entry_id, amount::VARCHAR, category,
                             entry_date::VARCHAR, description";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Check if an error message is a unique/primary key violation
fn is_unique_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || (lower.contains("constraint") && lower.contains("unique"))
}

/// DuckDB-backed [`AccountStore`]
///
/// A single connection behind a mutex. Each account is one `sys_accounts`
/// row plus its `sys_entries` rows; `position` gives insertion order.
pub struct DuckDbAccountStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbAccountStore {
    /// Open (or create) a database file and bring its schema up to date
    ///
    /// Retries with exponential backoff on file locking errors, which show
    /// up when another process is opening the same file.
    pub fn open(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    let store = Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    };
                    store.ensure_schema()?;
                    return Ok(store);
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[tally] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.map(Error::from).unwrap_or_else(|| {
            Error::storage(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a throwaway in-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory_with_flags(config)?),
            db_path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Extension autoloading stays off; nothing here needs ICU or httpfs
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Run any schema steps this file has not seen yet
    pub fn ensure_schema(&self) -> Result<SchemaVersion> {
        let mut conn = self.lock()?;
        Ok(schema::upgrade(&mut conn, ACCOUNT_SCHEMA)?)
    }

    /// Flush the write-ahead log into the database file
    pub fn checkpoint(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch("CHECKPOINT")?;
        Ok(())
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Size of the backing file in bytes (0 for in-memory stores)
    pub fn db_size(&self) -> Result<u64> {
        match &self.db_path {
            Some(path) => Ok(std::fs::metadata(path)?.len()),
            None => Ok(0),
        }
    }
}

impl AccountStore for DuckDbAccountStore {
    fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>> {
        let conn = self.lock()?;
        load_account(&conn, id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let conn = self.lock()?;
        let found = conn.query_row(
            "SELECT account_id FROM sys_accounts WHERE email = ?",
            params![email],
            |row| row.get::<_, String>(0),
        );
        let id = match found {
            Ok(id) => parse_stored_account_id(&id)?,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        load_account(&conn, id)
    }

    fn insert(&self, account: NewAccount) -> Result<UserAccount> {
        let id = AccountId::new();
        let now = now_micros();
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO sys_accounts (account_id, name, email, password_hash,
                                       created_at, updated_at)
             VALUES (?, ?, ?, ?, CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP))",
            params![
                id.to_string(),
                account.name,
                account.email,
                account.password_hash,
                format_timestamp(&now),
                format_timestamp(&now),
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e.to_string()) {
                Error::DuplicateEmail(account.email.clone())
            } else {
                Error::from(e)
            }
        })?;

        Ok(UserAccount {
            id,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            income: Vec::new(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn append_entry(
        &self,
        account_id: AccountId,
        collection: Collection,
        entry: NewEntry,
    ) -> Result<UserAccount> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        touch_account(&tx, account_id)?;
        tx.execute(
            "INSERT INTO sys_entries (entry_id, account_id, collection, amount, category,
                                      entry_date, description)
             VALUES (?, ?, ?, CAST(? AS DECIMAL(38, 10)), ?, CAST(? AS DATE), ?)",
            params![
                EntryId::new().to_string(),
                account_id.to_string(),
                collection.as_str(),
                entry.amount.to_string(),
                entry.category,
                entry.date.format("%Y-%m-%d").to_string(),
                entry.description,
            ],
        )?;

        let account = load_account(&tx, account_id)?
            .ok_or_else(|| Error::account_not_found(account_id.to_string()))?;
        tx.commit()?;
        Ok(account)
    }

    fn remove_entry(
        &self,
        account_id: AccountId,
        collection: Collection,
        entry_id: EntryId,
    ) -> Result<UserAccount> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        touch_account(&tx, account_id)?;
        // Zero rows deleted is fine: removing an absent entry is a no-op
        tx.execute(
            "DELETE FROM sys_entries WHERE account_id = ? AND collection = ? AND entry_id = ?",
            params![account_id.to_string(), collection.as_str(), entry_id.to_string()],
        )?;

        let account = load_account(&tx, account_id)?
            .ok_or_else(|| Error::account_not_found(account_id.to_string()))?;
        tx.commit()?;
        Ok(account)
    }

    fn list_entries(&self, account_id: AccountId, collection: Collection) -> Result<Vec<Entry>> {
        let conn = self.lock()?;
        ensure_account_exists(&conn, account_id)?;

        let rows = query_entries(
            &conn,
            &format!(
                "SELECT {} FROM sys_entries WHERE account_id = ? AND collection = ?
                 ORDER BY position",
                ENTRY_COLUMNS
            ),
            &[account_id.to_string(), collection.as_str().to_string()],
        )?;
        rows.into_iter()
            .map(|row| row.into_entry().map(|(_, _, entry)| entry))
            .collect()
    }

    fn list_transactions(&self, account_id: AccountId) -> Result<Vec<(i64, Transaction)>> {
        let conn = self.lock()?;
        ensure_account_exists(&conn, account_id)?;

        let rows = query_entries(
            &conn,
            &format!(
                "SELECT {} FROM sys_entries WHERE account_id = ? ORDER BY position",
                ENTRY_COLUMNS
            ),
            &[account_id.to_string()],
        )?;
        rows.into_iter()
            .map(|row| {
                let (position, collection, entry) = row.into_entry()?;
                Ok((position, Transaction::new(collection, entry)))
            })
            .collect()
    }

    fn aggregate(
        &self,
        account_id: AccountId,
        collection: Collection,
    ) -> Result<Option<CollectionStats>> {
        let conn = self.lock()?;
        // The join against sys_accounts tells "no account" (no row) apart
        // from "empty collection" (one row with zero count)
        let result = conn.query_row(
            "SELECT COUNT(e.entry_id),
                    COALESCE(SUM(e.amount), 0)::VARCHAR,
                    COALESCE(MAX(e.amount), 0)::VARCHAR
             FROM sys_accounts a
             LEFT JOIN sys_entries e
                ON e.account_id = a.account_id AND e.collection = ?
             WHERE a.account_id = ?
             GROUP BY a.account_id",
            params![collection.as_str(), account_id.to_string()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        );

        match result {
            Ok((count, sum, max)) => Ok(Some(CollectionStats {
                count,
                sum: parse_decimal(&sum)?,
                max: parse_decimal(&max)?,
            })),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count_accounts(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_accounts", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_entries(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_entries", [], |row| row.get(0))?;
        Ok(count)
    }
}

// === Row helpers ===

/// Raw entry columns, converted outside the row callback so that parse
/// failures surface as core errors
struct EntryRow {
    position: i64,
    collection: String,
    entry_id: String,
    amount: String,
    category: String,
    date: String,
    description: String,
}

impl EntryRow {
    fn into_entry(self) -> Result<(i64, Collection, Entry)> {
        let collection = Collection::from_storage(&self.collection)?;
        let entry = Entry {
            id: EntryId::parse(&self.entry_id)
                .map_err(|_| Error::storage(format!("corrupt entry id '{}'", self.entry_id)))?,
            amount: parse_decimal(&self.amount)?,
            category: self.category,
            date: parse_date(&self.date)?,
            description: self.description,
        };
        Ok((self.position, collection, entry))
    }
}

fn query_entries(conn: &Connection, sql: &str, args: &[String]) -> Result<Vec<EntryRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(duckdb::params_from_iter(args.iter()), |row| {
        Ok(EntryRow {
            position: row.get(0)?,
            collection: row.get(1)?,
            entry_id: row.get(2)?,
            amount: row.get(3)?,
            category: row.get(4)?,
            date: row.get(5)?,
            description: row.get(6)?,
        })
    })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

fn load_account(conn: &Connection, id: AccountId) -> Result<Option<UserAccount>> {
    let header = conn.query_row(
        &format!("SELECT {} FROM sys_accounts WHERE account_id = ?", ACCOUNT_COLUMNS),
        params![id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        },
    );
    let (name, email, password_hash, created_at, updated_at) = match header {
        Ok(header) => header,
        Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut account = UserAccount {
        id,
        name,
        email,
        password_hash,
        income: Vec::new(),
        expenses: Vec::new(),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    };

    let rows = query_entries(
        conn,
        &format!(
            "SELECT {} FROM sys_entries WHERE account_id = ? ORDER BY position",
            ENTRY_COLUMNS
        ),
        &[id.to_string()],
    )?;
    for row in rows {
        let (_, collection, entry) = row.into_entry()?;
        account.entries_mut(collection).push(entry);
    }

    Ok(Some(account))
}

fn ensure_account_exists(conn: &Connection, id: AccountId) -> Result<()> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sys_accounts WHERE account_id = ?",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    if count == 0 {
        return Err(Error::account_not_found(id.to_string()));
    }
    Ok(())
}

/// Bump `updated_at`, failing if the account does not exist
fn touch_account(conn: &Connection, id: AccountId) -> Result<()> {
    let updated = conn.execute(
        "UPDATE sys_accounts SET updated_at = CAST(? AS TIMESTAMP) WHERE account_id = ?",
        params![format_timestamp(&now_micros()), id.to_string()],
    )?;
    if updated == 0 {
        return Err(Error::account_not_found(id.to_string()));
    }
    Ok(())
}

// Helper functions

/// Current time at the microsecond precision DuckDB keeps
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| Error::storage(format!("corrupt timestamp '{}'", s)))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::storage(format!("corrupt date '{}'", s)))
}

/// Parse a stored amount, dropping the column's trailing zeros
fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s)
        .map(|amount| amount.normalize())
        .map_err(|_| Error::storage(format!("corrupt amount '{}'", s)))
}

fn parse_stored_account_id(s: &str) -> Result<AccountId> {
    AccountId::parse(s).map_err(|_| Error::storage(format!("corrupt account id '{}'", s)))
}
