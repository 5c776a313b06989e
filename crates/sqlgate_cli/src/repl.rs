//! Line-editing loop around the command dispatcher.

use crate::commands::{current_database, execute, help_text, parse, Command};
use crate::render::panel;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sqlgate_core::{schema_description, QueryService, QuerySession, StatementStore, TextGenerator};

const PROMPT: &str = "sql> ";
const PROMPT_PENDING: &str = "sql*> ";

/// Interactive session: one editor, one service, one query session.
pub struct Repl<S: StatementStore, G: TextGenerator> {
    editor: DefaultEditor,
    service: QueryService<S, G>,
    session: QuerySession,
}

impl<S: StatementStore, G: TextGenerator> Repl<S, G> {
    pub fn new(service: QueryService<S, G>) -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            service,
            session: QuerySession::new(),
        })
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> Result<(), ReadlineError> {
        self.print_banner();

        loop {
            let prompt = if self.session.last_generated().is_some() {
                PROMPT_PENDING
            } else {
                PROMPT
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    let command = parse(line);
                    if command == Command::Quit {
                        break;
                    }
                    println!(
                        "{}\n",
                        execute(&command, &self.service, &mut self.session)
                    );
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use 'quit' or Ctrl-D to exit");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        info!("event=session_end module=cli status=ok");
        Ok(())
    }

    fn print_banner(&self) {
        println!("SQL Database Manager");
        println!("Enter your query in natural language, e.g. 'Show all employees in the IT department'.");
        println!("Type 'help' for commands, 'quit' to exit.\n");
        println!("{}\n", current_database(&self.service));
        println!("{}\n", panel("Database Schema", &schema_description()));
        println!("{}\n", help_text());
    }
}
