//! Core of the natural-language SQL gate.
//!
//! Requests flow from [`generate`] through the [`validate`] allow-list into
//! the single-table store in [`repo`]; [`service`] wires the three together
//! around an explicit per-session state.

pub mod config;
pub mod db;
pub mod generate;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use config::{AppConfig, ConfigError};
pub use generate::{
    GeminiGenerator, GeminiSettings, GenerationError, QueryGenerator, TextGenerator,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::employee::{sample_employees, schema_description, Employee, EmployeeId};
pub use model::result_set::{CellValue, ResultSet};
pub use repo::statement_store::{
    affected_rows_message, ExecuteMode, ExecuteOutcome, SqliteStatementStore, StatementStore,
    StoreError, StoreResult,
};
pub use service::query_service::{
    ExecutionReport, GeneratedQuery, QueryError, QueryResult, QueryService, QuerySession,
};
pub use validate::sql_policy::{
    check_statement, validate_statement, StatementKind, ValidationError, ValidationReport,
    VALID_REASON,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
