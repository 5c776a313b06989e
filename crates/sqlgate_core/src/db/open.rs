//! Opening the process-owned SQLite connection.
//!
//! # Invariants
//! - A returned connection always has the `employees` table.
//! - The caller owns the returned connection; dropping it closes the store.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout stamp written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const EMPLOYEES_SCHEMA_SQL: &str = include_str!("employees.sql");

/// Opens a SQLite database file, creating it when missing, and makes sure
/// the `employees` table exists.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory store; contents vanish on drop.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let result = open()
        .map_err(DbError::from)
        .and_then(|mut conn| ensure_employees_table(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} schema={SCHEMA_VERSION} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }

    result
}

fn ensure_employees_table(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(DbError::NewerSchema { found });
    }

    // Files from earlier runs may already hold an unstamped table.
    let tx = conn.transaction()?;
    tx.execute_batch(EMPLOYEES_SCHEMA_SQL)?;
    if found < SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    tx.commit()?;

    Ok(())
}
