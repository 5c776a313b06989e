//! Terminal front end for the natural-language SQL gate.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the store once.
//! - Own the connection for the process lifetime and lend it to the
//!   session loop.

mod commands;
mod render;
mod repl;

use log::error;
use sqlgate_core::db::open_db;
use sqlgate_core::{
    init_logging, AppConfig, GeminiGenerator, QueryService, SqliteStatementStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("sqlgate: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("sqlgate: file logging disabled: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=app_start module=cli status=error error_code=db_open_failed");
            eprintln!(
                "sqlgate: cannot open database `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let generator = match GeminiGenerator::new(&config.gemini) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("sqlgate: cannot create generation client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = QueryService::new(SqliteStatementStore::new(&conn), generator);
    let result = repl::Repl::new(service).and_then(|mut repl| repl.run());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=session_end module=cli status=error error={err}");
            eprintln!("sqlgate: terminal error: {err}");
            ExitCode::FAILURE
        }
    }
}
