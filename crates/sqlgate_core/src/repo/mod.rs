//! Store access layer over the `employees` table.
//!
//! # Responsibility
//! - Execute single caller-supplied statements in fetch or mutate mode.
//! - Provide maintenance operations (seed, reset) and full-table reads.
//!
//! # Invariants
//! - Store APIs return typed `StoreError` values, never panics or
//!   prefixed strings.
//! - Statement validation is the caller's job; this layer executes what it
//!   is given.

pub mod statement_store;
