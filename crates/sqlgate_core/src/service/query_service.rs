//! Query service and per-session state.

use crate::generate::{GenerationError, QueryGenerator, TextGenerator};
use crate::model::employee::Employee;
use crate::model::result_set::ResultSet;
use crate::repo::statement_store::{ExecuteMode, ExecuteOutcome, StatementStore, StoreError};
use crate::validate::sql_policy::{validate_statement, StatementKind, ValidationError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type QueryResult<T> = Result<T, QueryError>;

/// Tagged failure of one user action.
#[derive(Debug)]
pub enum QueryError {
    /// The natural-language request was blank.
    EmptyRequest,
    /// Execute was requested before any statement was generated.
    NothingGenerated,
    Generation(GenerationError),
    Validation(ValidationError),
    Store(StoreError),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRequest => write!(f, "Please enter a query."),
            Self::NothingGenerated => write!(f, "Please generate an SQL query first."),
            Self::Generation(err) => write!(f, "Error generating SQL query: {err}"),
            Self::Validation(err) => write!(f, "Invalid SQL query: {err}"),
            Self::Store(err) => write!(f, "SQLite error: {err}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generation(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::EmptyRequest | Self::NothingGenerated => None,
        }
    }
}

impl From<GenerationError> for QueryError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<ValidationError> for QueryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Statement produced by the last successful generate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery {
    pub request: String,
    pub sql: String,
}

/// State carried between the generate and execute actions of one session.
#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    last_generated: Option<GeneratedQuery>,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_generated(&self) -> Option<&GeneratedQuery> {
        self.last_generated.as_ref()
    }

    pub fn clear(&mut self) {
        self.last_generated = None;
    }
}

/// Result of a validated and executed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub sql: String,
    pub kind: StatementKind,
    pub outcome: ExecuteOutcome,
}

/// Generate/execute use cases over a store and a text-generation backend.
pub struct QueryService<S: StatementStore, G: TextGenerator> {
    store: S,
    generator: QueryGenerator<G>,
}

impl<S: StatementStore, G: TextGenerator> QueryService<S, G> {
    pub fn new(store: S, backend: G) -> Self {
        Self {
            store,
            generator: QueryGenerator::new(backend),
        }
    }

    /// Generates a candidate statement and remembers it in `session`.
    ///
    /// A failed generation leaves the previous statement in place.
    pub fn generate(&self, session: &mut QuerySession, request: &str) -> QueryResult<String> {
        let request = request.trim();
        if request.is_empty() {
            return Err(QueryError::EmptyRequest);
        }

        let sql = self.generator.generate(request)?;
        session.last_generated = Some(GeneratedQuery {
            request: request.to_string(),
            sql: sql.clone(),
        });
        Ok(sql)
    }

    /// Validates and executes the statement remembered in `session`.
    pub fn execute(&self, session: &QuerySession) -> QueryResult<ExecutionReport> {
        let generated = session
            .last_generated
            .as_ref()
            .ok_or(QueryError::NothingGenerated)?;
        self.execute_statement(&generated.sql)
    }

    /// Validates and executes a caller-supplied statement.
    ///
    /// `SELECT` statements fetch rows; every other allowed kind reports the
    /// affected row count.
    pub fn execute_statement(&self, sql: &str) -> QueryResult<ExecutionReport> {
        let kind = validate_statement(sql)?;
        let mode = if kind.returns_rows() {
            ExecuteMode::Fetch
        } else {
            ExecuteMode::Mutate
        };

        let outcome = self.store.execute(sql, mode)?;
        info!(
            "event=query_execute module=service status=ok kind={}",
            kind.as_str()
        );
        Ok(ExecutionReport {
            sql: sql.trim().to_string(),
            kind,
            outcome,
        })
    }

    /// Upserts the sample rows; returns the number written.
    pub fn seed(&self) -> QueryResult<usize> {
        Ok(self.store.seed()?)
    }

    /// Deletes every row and reseeds; returns the resulting row count.
    pub fn reset(&self) -> QueryResult<usize> {
        Ok(self.store.reset()?)
    }

    /// Current table contents for display.
    pub fn snapshot(&self) -> QueryResult<ResultSet> {
        Ok(self.store.snapshot()?)
    }

    pub fn employees(&self) -> QueryResult<Vec<Employee>> {
        Ok(self.store.read_all()?)
    }

    pub fn row_count(&self) -> QueryResult<usize> {
        Ok(self.store.count()?)
    }
}
