/*!
 * Session state and line dispatch
 *
 * A `Session` owns everything one interactive run needs: the connection,
 * the active output mode and the shared history. The line editor hands it
 * each submitted line and gets back whether to keep going.
 */

use super::meta::{classify, Command, HELP_TEXT};
use super::query::QueryExecutor;
use super::schema;
use crate::database::Database;
use crate::history::SharedHistory;
use crate::render::RenderMode;
use anyhow::Result;
use std::io::Write;
use std::rc::Rc;
use tracing::{debug, warn};

/// What the caller should do after a line has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session<W: Write> {
    database: Rc<Database>,
    history: SharedHistory,
    mode: RenderMode,
    executor: QueryExecutor,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(database: Rc<Database>, history: SharedHistory, mode: RenderMode, out: W) -> Self {
        Self {
            database,
            history,
            mode,
            executor: QueryExecutor::new(),
            out,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    pub fn print_banner(&mut self) -> Result<()> {
        writeln!(self.out, "{HELP_TEXT}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Record and dispatch one submitted line. Blank input is ignored.
    /// Errors are only returned when writing to the terminal fails.
    pub fn handle_line(&mut self, input: &str) -> Result<Flow> {
        let line = input.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        match self.history.lock() {
            Ok(mut history) => history.record(line),
            Err(_) => warn!("history lock poisoned; entry not recorded"),
        }

        let command = classify(line);
        debug!(?command, "dispatching");

        let flow = self.dispatch(command)?;
        self.out.flush()?;
        Ok(flow)
    }

    fn dispatch(&mut self, command: Command<'_>) -> Result<Flow> {
        let db = self.database.as_ref();
        let out = &mut self.out;

        match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::ToggleExpanded => {
                self.mode = self.mode.toggle_expanded();
                writeln!(
                    out,
                    "Expanded display is now {}",
                    on_off(self.mode.is_expanded())
                )?;
            }
            Command::ToggleJson => {
                self.mode = self.mode.toggle_json();
                writeln!(out, "JSON output is now {}", on_off(self.mode.is_json()))?;
            }
            Command::Describe(table) => {
                if let Err(e) = schema::describe_table(db, table, out) {
                    writeln!(out, "Schema error: {e}")?;
                }
            }
            Command::DescribeUsage => writeln!(out, "Usage: \\d <table>")?,
            Command::ListRelations => {
                if let Err(e) = schema::list_relations(db, out) {
                    writeln!(out, "Error: {e}")?;
                }
            }
            Command::ListIndexes => {
                if let Err(e) = schema::list_indexes(db, out) {
                    writeln!(out, "Error: {e}")?;
                }
            }
            Command::SchemaDump(table) => {
                if let Err(e) = schema::schema_dump(db, table, out) {
                    writeln!(out, "Schema query failed: {e}")?;
                }
            }
            Command::Help => writeln!(out, "{HELP_TEXT}")?,
            Command::Statement(query) => self.executor.execute(db, query, self.mode, out)?,
        }

        Ok(Flow::Continue)
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
