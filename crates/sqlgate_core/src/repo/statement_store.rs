//! Statement store contract and SQLite implementation.
//!
//! # Responsibility
//! - Run exactly one statement against the borrowed connection.
//! - Keep seed/reset idempotent and atomic.
//!
//! # Invariants
//! - Seed replaces by primary key, so repeated seeding never duplicates rows.
//! - Reset leaves exactly the sample row set.
//! - Input holding a second statement after the first `;` is refused
//!   before anything runs.
//! - Typed reads reject rows whose cells do not fit `Employee` instead of
//!   coercing them.

use crate::db::DbError;
use crate::model::employee::{sample_employees, Employee, EMPLOYEES_TABLE};
use crate::model::result_set::{CellValue, ResultSet};
use log::{debug, error, info};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    department,
    salary
FROM employees
ORDER BY id ASC;";

const SEED_UPSERT_SQL: &str = "INSERT OR REPLACE INTO employees (id, name, department, salary)
VALUES (?1, ?2, ?3, ?4);";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for statement execution and row decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    MultipleStatements,
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MultipleStatements => {
                write!(f, "You can only execute one statement at a time.")
            }
            Self::InvalidData(message) => write!(f, "invalid employee row: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MultipleStatements | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// How a statement's result is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteMode {
    /// Collect every returned row.
    Fetch,
    /// Apply the change and report the affected row count.
    Mutate,
}

/// Result of one executed statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecuteOutcome {
    Rows(ResultSet),
    Affected { rows_affected: usize },
}

/// Status line shown for mutate-mode results.
pub fn affected_rows_message(rows_affected: usize) -> String {
    format!("Query executed successfully. Rows affected: {rows_affected}")
}

/// Contract for the single-table statement store.
pub trait StatementStore {
    fn execute(&self, sql: &str, mode: ExecuteMode) -> StoreResult<ExecuteOutcome>;
    fn seed(&self) -> StoreResult<usize>;
    fn reset(&self) -> StoreResult<usize>;
    fn read_all(&self) -> StoreResult<Vec<Employee>>;
    fn snapshot(&self) -> StoreResult<ResultSet>;
    fn count(&self) -> StoreResult<usize>;
}

/// SQLite-backed statement store borrowing a process-owned connection.
pub struct SqliteStatementStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatementStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch(&self, sql: &str) -> StoreResult<ResultSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let column_count = columns.len();

        let mut rows = stmt.query([])?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for index in 0..column_count {
                cells.push(CellValue::from(row.get_ref(index)?));
            }
            collected.push(cells);
        }

        Ok(ResultSet {
            columns,
            rows: collected,
        })
    }

    fn mutate(&self, sql: &str) -> StoreResult<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        // Step to completion so `RETURNING` rows are drained and the
        // autocommit lands before the change count is read.
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}
        drop(rows);

        let changes = self.conn.changes();
        usize::try_from(changes)
            .map_err(|_| StoreError::InvalidData(format!("change count `{changes}` overflows")))
    }
}

impl StatementStore for SqliteStatementStore<'_> {
    fn execute(&self, sql: &str, mode: ExecuteMode) -> StoreResult<ExecuteOutcome> {
        let statement = terminate_statement(sql);
        let started_at = Instant::now();

        let result = ensure_single_statement(&statement).and_then(|()| match mode {
            ExecuteMode::Fetch => self.fetch(&statement).map(ExecuteOutcome::Rows),
            ExecuteMode::Mutate => self
                .mutate(&statement)
                .map(|rows_affected| ExecuteOutcome::Affected { rows_affected }),
        });

        match &result {
            Ok(outcome) => info!(
                "event=statement_execute module=store status=ok mode={} rows={} duration_ms={}",
                mode_label(mode),
                outcome_rows(outcome),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=statement_execute module=store status=error mode={} duration_ms={} error={}",
                mode_label(mode),
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    fn seed(&self) -> StoreResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let written = upsert_sample_rows(&tx)?;
        tx.commit()?;

        info!("event=store_seed module=store status=ok rows={written}");
        Ok(written)
    }

    fn reset(&self) -> StoreResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM employees;", [])?;
        let written = upsert_sample_rows(&tx)?;
        tx.commit()?;

        info!("event=store_reset module=store status=ok removed={removed} rows={written}");
        Ok(written)
    }

    fn read_all(&self) -> StoreResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(EMPLOYEE_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        debug!(
            "event=store_read_all module=store status=ok rows={}",
            employees.len()
        );
        Ok(employees)
    }

    fn snapshot(&self) -> StoreResult<ResultSet> {
        self.fetch(&format!("SELECT * FROM {EMPLOYEES_TABLE} ORDER BY id ASC;"))
    }

    fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative row count `{count}`")))
    }
}

/// Trims the statement and appends a terminating `;` when missing.
pub fn terminate_statement(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{trimmed};")
    }
}

/// Refuses text that carries SQL after the first statement terminator.
///
/// Quoted literals, quoted identifiers and comments are skipped, so a `;`
/// inside `'a;b'` does not count. Trailing whitespace and comments are
/// allowed.
pub fn ensure_single_statement(sql: &str) -> StoreResult<()> {
    match first_statement_end(sql) {
        Some(end) if holds_sql(&sql[end..]) => Err(StoreError::MultipleStatements),
        _ => Ok(()),
    }
}

fn first_statement_end(sql: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        index = match bytes[index] {
            quote @ (b'\'' | b'"' | b'`') => skip_quoted(bytes, index, quote),
            b'[' => skip_quoted(bytes, index, b']'),
            b'-' if bytes.get(index + 1) == Some(&b'-') => find_from(bytes, index + 2, b"\n")
                .map_or(bytes.len(), |newline| newline + 1),
            b'/' if bytes.get(index + 1) == Some(&b'*') => {
                find_from(bytes, index + 2, b"*/").map_or(bytes.len(), |close| close + 2)
            }
            b';' => return Some(index + 1),
            _ => index + 1,
        };
    }
    None
}

/// Returns the index just past the closing delimiter. A doubled quote is an
/// escaped quote; bracketed identifiers have no escape.
fn skip_quoted(bytes: &[u8], open: usize, close: u8) -> usize {
    let mut index = open + 1;
    while index < bytes.len() {
        if bytes[index] == close {
            if close != b']' && bytes.get(index + 1) == Some(&close) {
                index += 2;
                continue;
            }
            return index + 1;
        }
        index += 1;
    }
    bytes.len()
}

fn find_from(bytes: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(start..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| start + offset)
}

fn holds_sql(text: &str) -> bool {
    let mut rest = text.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail).trim_start();
        } else {
            return !rest.is_empty();
        }
    }
}

fn upsert_sample_rows(conn: &Connection) -> StoreResult<usize> {
    let mut stmt = conn.prepare(SEED_UPSERT_SQL)?;
    let mut written = 0;
    for employee in sample_employees() {
        written += stmt.execute(params![
            employee.id,
            employee.name,
            employee.department,
            employee.salary,
        ])?;
    }
    Ok(written)
}

fn parse_employee_row(row: &Row<'_>) -> StoreResult<Employee> {
    Ok(Employee {
        id: row.get("id").map_err(decode_error)?,
        name: row.get("name").map_err(decode_error)?,
        department: row.get("department").map_err(decode_error)?,
        salary: row.get("salary").map_err(decode_error)?,
    })
}

fn decode_error(err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::InvalidColumnType(_, column, found) => StoreError::InvalidData(format!(
            "column `{column}` holds a {found} value"
        )),
        other => other.into(),
    }
}

fn mode_label(mode: ExecuteMode) -> &'static str {
    match mode {
        ExecuteMode::Fetch => "fetch",
        ExecuteMode::Mutate => "mutate",
    }
}

fn outcome_rows(outcome: &ExecuteOutcome) -> usize {
    match outcome {
        ExecuteOutcome::Rows(set) => set.len(),
        ExecuteOutcome::Affected { rows_affected } => *rows_affected,
    }
}

#[cfg(test)]
mod tests {
    use super::{affected_rows_message, ensure_single_statement, terminate_statement, StoreError};

    #[test]
    fn terminate_statement_appends_missing_separator() {
        assert_eq!(
            terminate_statement("  SELECT * FROM employees "),
            "SELECT * FROM employees;"
        );
        assert_eq!(terminate_statement("DELETE FROM employees;"), "DELETE FROM employees;");
    }

    #[test]
    fn affected_rows_message_reports_row_count() {
        assert_eq!(
            affected_rows_message(3),
            "Query executed successfully. Rows affected: 3"
        );
    }

    #[test]
    fn single_statement_allows_trailing_blanks_and_comments() {
        for sql in [
            "SELECT * FROM employees",
            "SELECT * FROM employees;",
            "SELECT * FROM employees;   \n",
            "DELETE FROM employees WHERE id = 1; -- done",
            "DELETE FROM employees WHERE id = 1; /* done */ ",
            "SELECT * FROM employees WHERE name = 'a;b';",
            "SELECT * FROM employees WHERE name = 'it''s; fine';",
            "SELECT \"odd;name\" FROM employees;",
            "SELECT * FROM employees -- ; DROP TABLE employees\n;",
        ] {
            assert!(ensure_single_statement(sql).is_ok(), "{sql}");
        }
    }

    #[test]
    fn single_statement_refuses_a_second_statement() {
        for sql in [
            "DELETE FROM employees WHERE id = 1; DELETE FROM employees;",
            "SELECT * FROM employees; DROP TABLE employees;",
            "SELECT * FROM employees;;",
            "SELECT 'x;'; /* c */ UPDATE employees SET salary = 0;",
        ] {
            assert!(
                matches!(
                    ensure_single_statement(sql),
                    Err(StoreError::MultipleStatements)
                ),
                "{sql}"
            );
        }
    }
}
