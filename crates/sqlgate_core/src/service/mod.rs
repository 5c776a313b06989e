//! Use-case orchestration for the generate/validate/execute flow.
//!
//! # Responsibility
//! - Chain generator, validator and store into user-level actions.
//! - Keep per-session state explicit instead of global.
//!
//! # Invariants
//! - No statement reaches the store without passing the validator.
//! - Every failure is returned as a tagged `QueryError`.

pub mod query_service;
