//! Statement-kind and table-scope checks.

use crate::model::employee::EMPLOYEES_TABLE;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static STATEMENT_KIND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(SELECT|INSERT|UPDATE|DELETE)").expect("valid statement kind regex")
});
static TABLE_REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(FROM|INTO|UPDATE)\s+(\w+)").expect("valid table reference regex")
});

/// Reason reported for statements that pass both checks.
pub const VALID_REASON: &str = "Valid SQL query";

/// Leading keyword of an accepted statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Whether statements of this kind return rows to collect.
    pub fn returns_rows(self) -> bool {
        matches!(self, Self::Select)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Why a statement was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The statement does not start with an allowed keyword.
    DisallowedStatementKind,
    /// At least one referenced table is not `employees`.
    DisallowedTable { tables: Vec<String> },
}

impl ValidationError {
    /// Human-readable reason shown to the user.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::DisallowedStatementKind => {
                "Only SELECT, INSERT, UPDATE, or DELETE statements are allowed"
            }
            Self::DisallowedTable { .. } => "Only the 'employees' table is allowed in the query",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

impl Error for ValidationError {}

/// Flag-plus-reason view of a validation result; both fields are always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub reason: String,
}

/// Validates one statement and returns its kind when allowed.
///
/// The statement is expected to be already stripped of formatting noise.
///
/// # Errors
/// - `DisallowedStatementKind` when the leading keyword (case-insensitive,
///   after leading whitespace) is not an allowed kind.
/// - `DisallowedTable` when any `FROM`/`INTO`/`UPDATE` target differs from
///   `employees`, ignoring case.
pub fn validate_statement(sql: &str) -> Result<StatementKind, ValidationError> {
    let Some(kind) = leading_kind(sql) else {
        warn!(
            "event=statement_validate module=validator status=rejected reason=statement_kind len={}",
            sql.len()
        );
        return Err(ValidationError::DisallowedStatementKind);
    };

    let tables = referenced_tables(sql);
    let foreign = tables
        .iter()
        .filter(|table| !table.eq_ignore_ascii_case(EMPLOYEES_TABLE))
        .cloned()
        .collect::<Vec<_>>();
    if !foreign.is_empty() {
        warn!(
            "event=statement_validate module=validator status=rejected reason=table_scope kind={} tables={}",
            kind.as_str(),
            foreign.join(",")
        );
        return Err(ValidationError::DisallowedTable { tables: foreign });
    }

    // An empty `tables` set passes; the regex may miss table references.
    debug!(
        "event=statement_validate module=validator status=ok kind={} table_refs={}",
        kind.as_str(),
        tables.len()
    );
    Ok(kind)
}

/// Runs [`validate_statement`] and reports the outcome as a flag and reason.
pub fn check_statement(sql: &str) -> ValidationReport {
    match validate_statement(sql) {
        Ok(_) => ValidationReport {
            is_valid: true,
            reason: VALID_REASON.to_string(),
        },
        Err(err) => ValidationReport {
            is_valid: false,
            reason: err.reason().to_string(),
        },
    }
}

/// Returns every table name captured after `FROM`, `INTO` or `UPDATE`, in
/// statement order.
pub fn referenced_tables(sql: &str) -> Vec<String> {
    TABLE_REFERENCE_RE
        .captures_iter(sql)
        .filter_map(|captures| captures.get(2))
        .map(|table| table.as_str().to_string())
        .collect()
}

fn leading_kind(sql: &str) -> Option<StatementKind> {
    STATEMENT_KIND_RE
        .captures(sql)
        .and_then(|captures| captures.get(1))
        .and_then(|keyword| StatementKind::from_keyword(keyword.as_str()))
}
