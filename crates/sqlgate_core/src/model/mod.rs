//! Domain model for the single-table employee store.
//!
//! # Responsibility
//! - Define the typed `Employee` record and the fixed sample row set.
//! - Define dynamically typed result sets for arbitrary `SELECT` output.
//!
//! # Invariants
//! - `Employee::id` is the primary key and unique within the store.
//! - Non-key columns carry no constraints and may be `NULL`.

pub mod employee;
pub mod result_set;
