//! Allow-list gate for generated SQL statements.
//!
//! # Responsibility
//! - Decide whether a statement may reach the store.
//! - Classify accepted statements so the caller can pick fetch or mutate
//!   execution.
//!
//! # Invariants
//! - Only `SELECT`, `INSERT`, `UPDATE` and `DELETE` statements pass.
//! - Every table named after `FROM`, `INTO` or `UPDATE` must be `employees`.
//!
//! This is a syntactic filter, not a parser. A passing statement is not
//! proven safe: comments, subqueries and clauses outside the matched
//! keywords are not inspected, and a statement with no detectable table
//! clause passes the table check.

pub mod sql_policy;
