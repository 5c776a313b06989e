//! Natural-language to SQL generation.
//!
//! # Responsibility
//! - Turn a free-text request into a candidate SQL statement through an
//!   external text-generation service.
//! - Strip formatting artifacts from the service reply.
//!
//! # Invariants
//! - One outbound call per request; no local state is mutated.
//! - Service failures surface as `GenerationError`, never as panics.
//! - Output is a candidate only and must pass the validator before use.

pub mod gemini;
pub mod sanitize;

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub use gemini::{GeminiGenerator, GeminiSettings};
pub use sanitize::sanitize_generated_sql;

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Failure while producing a candidate statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// No credential was configured for the service.
    MissingApiKey,
    /// The request never produced an HTTP response.
    Transport(String),
    /// The service answered with a non-success status.
    Service { status: u16, body: String },
    /// The service refused to answer the prompt.
    Blocked(String),
    /// The response body did not have the expected shape.
    InvalidResponse(String),
    /// The reply contained no usable statement text.
    EmptyReply,
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing API key for the generation service"),
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Service { status, body } => write!(f, "service returned {status}: {body}"),
            Self::Blocked(reason) => write!(f, "prompt blocked by the service: {reason}"),
            Self::InvalidResponse(message) => write!(f, "unexpected response: {message}"),
            Self::EmptyReply => write!(f, "the service returned no SQL"),
        }
    }
}

impl Error for GenerationError {}

/// One-shot text-generation backend: prompt in, reply text out.
pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> GenerationResult<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn complete(&self, prompt: &str) -> GenerationResult<String> {
        (**self).complete(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn complete(&self, prompt: &str) -> GenerationResult<String> {
        (**self).complete(prompt)
    }
}

/// Builds the fixed-schema prompt sent for one user request.
pub fn build_prompt(request: &str) -> String {
    format!(
        "Convert the following text to a SQL query for a table named 'employees' with columns \
         'id', 'name', 'department', and 'salary'. The query can be SELECT, INSERT, UPDATE, or \
         DELETE. Return only the SQL query without any explanation or formatting: {request}"
    )
}

/// Wraps a [`TextGenerator`] with the employees prompt and reply cleanup.
pub struct QueryGenerator<G: TextGenerator> {
    backend: G,
}

impl<G: TextGenerator> QueryGenerator<G> {
    pub fn new(backend: G) -> Self {
        Self { backend }
    }

    /// Generates a sanitized candidate statement for `request`.
    ///
    /// Callers reject blank requests before calling.
    ///
    /// # Errors
    /// - Any backend failure, unchanged.
    /// - `EmptyReply` when nothing is left after sanitizing.
    pub fn generate(&self, request: &str) -> GenerationResult<String> {
        let started_at = Instant::now();
        info!(
            "event=sql_generate module=generator status=start request_len={}",
            request.len()
        );

        let reply = match self.backend.complete(&build_prompt(request)) {
            Ok(reply) => reply,
            Err(err) => {
                error!(
                    "event=sql_generate module=generator status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        let statement = sanitize_generated_sql(&reply);
        if statement.is_empty() {
            error!(
                "event=sql_generate module=generator status=error duration_ms={} error_code=empty_reply reply_len={}",
                started_at.elapsed().as_millis(),
                reply.len()
            );
            return Err(GenerationError::EmptyReply);
        }

        info!(
            "event=sql_generate module=generator status=ok duration_ms={} reply_len={} sql_len={}",
            started_at.elapsed().as_millis(),
            reply.len(),
            statement.len()
        );
        Ok(statement)
    }
}
