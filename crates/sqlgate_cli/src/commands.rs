//! Command parsing and dispatch for the interactive session.

use crate::render::{notice, panel, table, Notice};
use sqlgate_core::{
    affected_rows_message, schema_description, ExecuteOutcome, ExecutionReport, QueryError,
    QueryService, QuerySession, StatementStore, TextGenerator, VALID_REASON,
};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Turn free text into a SQL statement.
    Generate { request: String },
    /// Validate and run the last generated statement.
    Execute,
    /// Validate and run a statement typed by the user.
    Run { sql: String },
    /// Upsert the sample rows.
    Seed,
    /// Delete every row and reseed.
    Reset,
    /// Print the current table contents.
    Show,
    /// Print the table schema.
    Schema,
    Help,
    Quit,
}

/// Parses one input line.
///
/// Lines that do not start with a command word are generation requests.
pub fn parse(input: &str) -> Command {
    let input = input.trim();
    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "gen" | "generate" => Command::Generate {
            request: rest.to_string(),
        },
        "exec" | "execute" if rest.is_empty() => Command::Execute,
        "run" => Command::Run {
            sql: rest.to_string(),
        },
        "seed" if rest.is_empty() => Command::Seed,
        "reset" if rest.is_empty() => Command::Reset,
        "show" | "table" if rest.is_empty() => Command::Show,
        "schema" if rest.is_empty() => Command::Schema,
        "help" | "?" if rest.is_empty() => Command::Help,
        "quit" | "exit" | "q" if rest.is_empty() => Command::Quit,
        _ => Command::Generate {
            request: input.to_string(),
        },
    }
}

/// Runs `command` and returns the text to print.
///
/// Failures are rendered as notices; nothing here ends the session.
pub fn execute<S: StatementStore, G: TextGenerator>(
    command: &Command,
    service: &QueryService<S, G>,
    session: &mut QuerySession,
) -> String {
    match command {
        Command::Generate { request } => match service.generate(session, request) {
            Ok(sql) => panel("Generated SQL Query", &sql),
            Err(err @ QueryError::EmptyRequest) => notice(Notice::Warning, err.to_string()),
            Err(err) => notice(Notice::Error, err.to_string()),
        },
        Command::Execute => match service.execute(session) {
            Ok(report) => render_report(service, &report),
            Err(err @ QueryError::NothingGenerated) => notice(Notice::Warning, err.to_string()),
            Err(err) => render_failure(&err),
        },
        Command::Run { sql } => {
            if sql.is_empty() {
                return notice(Notice::Warning, "Usage: run <sql>");
            }
            match service.execute_statement(sql) {
                Ok(report) => render_report(service, &report),
                Err(err) => render_failure(&err),
            }
        }
        Command::Seed => match service.seed() {
            Ok(_) => [
                notice(Notice::Success, "Sample database created successfully!"),
                current_database(service),
            ]
            .join("\n\n"),
            Err(err) => notice(Notice::Error, err.to_string()),
        },
        Command::Reset => match service.reset() {
            Ok(_) => [
                notice(Notice::Success, "Database reset to initial state!"),
                current_database(service),
            ]
            .join("\n\n"),
            Err(err) => notice(Notice::Error, err.to_string()),
        },
        Command::Show => current_database(service),
        Command::Schema => panel("Database Schema", &schema_description()),
        Command::Help => help_text(),
        Command::Quit => String::new(),
    }
}

/// "Current Database" panel, or an error notice when the read fails.
pub fn current_database<S: StatementStore, G: TextGenerator>(
    service: &QueryService<S, G>,
) -> String {
    match service.snapshot() {
        Ok(set) if set.is_empty() => panel(
            "Current Database",
            &notice(Notice::Info, "The employees table is empty."),
        ),
        Ok(set) => panel("Current Database", &table(&set)),
        Err(err) => notice(Notice::Error, err.to_string()),
    }
}

pub fn help_text() -> String {
    panel(
        "Commands",
        "gen <text>   generate SQL from a natural-language request (bare text works too)\n\
         exec         validate and run the last generated statement\n\
         run <sql>    validate and run a statement you type\n\
         seed         create the sample rows\n\
         reset        delete all rows and recreate the sample rows\n\
         show         print the current table\n\
         schema       print the table schema\n\
         help         show this help\n\
         quit         leave the session",
    )
}

fn render_report<S: StatementStore, G: TextGenerator>(
    service: &QueryService<S, G>,
    report: &ExecutionReport,
) -> String {
    let results = match &report.outcome {
        ExecuteOutcome::Rows(set) if set.is_empty() => notice(Notice::Info, "No results found."),
        ExecuteOutcome::Rows(set) => table(set),
        ExecuteOutcome::Affected { rows_affected } => affected_rows_message(*rows_affected),
    };

    [
        notice(Notice::Success, VALID_REASON),
        panel("Query Results", &results),
        current_database(service),
    ]
    .join("\n\n")
}

fn render_failure(err: &QueryError) -> String {
    match err {
        // The statement passed validation; only the store refused it.
        QueryError::Store(_) => [
            notice(Notice::Success, VALID_REASON),
            panel("Query Results", &notice(Notice::Error, err.to_string())),
        ]
        .join("\n\n"),
        _ => notice(Notice::Error, err.to_string()),
    }
}
