//! Versioned schemas for the account and event-log databases
//!
//! Each database records how many of its steps have run in a one-row
//! `sys_schema` table. Opening a database runs the missing steps in order,
//! inside a single transaction, and bumps the version. Steps are append-only:
//! a released step is never edited, a change gets a new step at the end.

use duckdb::{params, Connection};

/// One schema change; its version is its 1-based position in the list
#[derive(Debug, Clone, Copy)]
pub struct SchemaStep {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Steps for the account database
pub const ACCOUNT_SCHEMA: &[SchemaStep] = &[SchemaStep {
    name: "accounts_v1",
    sql: include_str!("accounts_v1.sql"),
}];

/// Steps for logs.duckdb, versioned apart from the account database
pub const EVENT_LOG_SCHEMA: &[SchemaStep] = &[SchemaStep {
    name: "event_log_v1",
    sql: include_str!("event_log_v1.sql"),
}];

/// Schema version of a database before and after an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub before: usize,
    pub after: usize,
}

impl SchemaVersion {
    /// Number of steps run by this upgrade
    pub fn applied(&self) -> usize {
        self.after - self.before
    }
}

/// Bring a database up to the last step of `steps`
///
/// A database written by a newer build (version past the end of `steps`)
/// is left alone.
pub fn upgrade(conn: &mut Connection, steps: &[SchemaStep]) -> duckdb::Result<SchemaVersion> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS sys_schema (version BIGINT NOT NULL)")?;

    let tx = conn.transaction()?;
    let stored: i64 =
        tx.query_row("SELECT COALESCE(MAX(version), 0) FROM sys_schema", [], |row| {
            row.get(0)
        })?;
    let before = usize::try_from(stored).unwrap_or(0);

    if before >= steps.len() {
        return Ok(SchemaVersion { before, after: before });
    }

    for step in &steps[before..] {
        tx.execute_batch(step.sql)?;
    }

    let after = steps.len();
    tx.execute("DELETE FROM sys_schema", [])?;
    tx.execute("INSERT INTO sys_schema (version) VALUES (?)", params![after as i64])?;
    tx.commit()?;

    Ok(SchemaVersion { before, after })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_fresh_database_gets_every_step() {
        let mut conn = Connection::open_in_memory().unwrap();

        let version = upgrade(&mut conn, ACCOUNT_SCHEMA).unwrap();
        assert_eq!(version.before, 0);
        assert_eq!(version.after, ACCOUNT_SCHEMA.len());
        assert!(table_exists(&conn, "sys_accounts"));
        assert!(table_exists(&conn, "sys_entries"));
    }

    #[test]
    fn test_second_upgrade_runs_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        upgrade(&mut conn, EVENT_LOG_SCHEMA).unwrap();

        let version = upgrade(&mut conn, EVENT_LOG_SCHEMA).unwrap();
        assert_eq!(version.applied(), 0);
        assert!(table_exists(&conn, "sys_logs"));
    }

    #[test]
    fn test_new_step_runs_on_existing_database() {
        const EXTENDED: &[SchemaStep] = &[
            SchemaStep {
                name: "one",
                sql: "CREATE TABLE t_one (id INTEGER)",
            },
            SchemaStep {
                name: "two",
                sql: "CREATE TABLE t_two (id INTEGER)",
            },
        ];

        let mut conn = Connection::open_in_memory().unwrap();
        upgrade(&mut conn, &EXTENDED[..1]).unwrap();

        let version = upgrade(&mut conn, EXTENDED).unwrap();
        assert_eq!(version, SchemaVersion { before: 1, after: 2 });
        assert!(table_exists(&conn, "t_two"));
    }

    #[test]
    fn test_failed_step_leaves_version_unchanged() {
        const BROKEN: &[SchemaStep] = &[
            SchemaStep {
                name: "ok",
                sql: "CREATE TABLE t_ok (id INTEGER)",
            },
            SchemaStep {
                name: "broken",
                sql: "CREATE TABLE t_ok (id INTEGER)",
            },
        ];

        let mut conn = Connection::open_in_memory().unwrap();
        assert!(upgrade(&mut conn, BROKEN).is_err());

        let version = upgrade(&mut conn, &BROKEN[..1]).unwrap();
        assert_eq!(version.before, 0);
        assert!(table_exists(&conn, "t_ok"));
    }

    #[test]
    fn test_newer_database_left_alone() {
        let mut conn = Connection::open_in_memory().unwrap();
        upgrade(&mut conn, ACCOUNT_SCHEMA).unwrap();

        let version = upgrade(&mut conn, &[]).unwrap();
        assert_eq!(version.applied(), 0);
        assert_eq!(version.before, ACCOUNT_SCHEMA.len());
    }
}
