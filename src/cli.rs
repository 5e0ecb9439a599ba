use crate::commands::{Flow, Session};
use crate::completion::{CompletionEngine, SqliteHelper};
use crate::database::Database;
use crate::history::{HistoryStore, InquirePicker, RecallHandler};
use crate::render::RenderMode;
use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::{
    history::DefaultHistory, CompletionType, Config, Editor, EventHandler, KeyEvent,
};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

const PROMPT: &str = "sqlite> ";

/// Everything the interactive loop needs, already resolved from flags and config.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub database: PathBuf,
    /// `None` keeps history in memory for this run only.
    pub history_path: Option<PathBuf>,
    pub mode: RenderMode,
}

pub struct Cli {
    session: Session<Stdout>,
    editor: Editor<SqliteHelper, DefaultHistory>,
}

impl Cli {
    pub fn new(options: CliOptions) -> Result<Self> {
        let database = Rc::new(Database::open(&options.database)?);

        let store = match &options.history_path {
            Some(path) => HistoryStore::load(path),
            None => HistoryStore::in_memory(),
        };

        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .edit_mode(rustyline::EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;
        let engine = CompletionEngine::new().context("Failed to compile completion rules")?;
        editor.set_helper(Some(SqliteHelper::new(Rc::clone(&database), engine)));

        // Arrow keys walk the same entries Ctrl-R searches.
        for entry in store.entries() {
            editor.add_history_entry(entry.text())?;
        }
        debug!(entries = store.entries().len(), "seeded editor history");

        let history = store.into_shared();
        editor.bind_sequence(
            KeyEvent::ctrl('R'),
            EventHandler::Conditional(Box::new(RecallHandler::new(
                history.clone(),
                InquirePicker,
            ))),
        );

        let session = Session::new(database, history, options.mode, io::stdout());
        Ok(Self { session, editor })
    }

    /// Read lines until `exit` or end of input, then append the session's
    /// history to the history file.
    pub fn run(&mut self) -> Result<()> {
        self.session.print_banner()?;
        debug!(mode = %self.session.mode(), "session started");

        let result = self.read_loop();
        self.save_history();
        result
    }

    fn read_loop(&mut self) -> Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let entry = line.trim();
                    if !entry.is_empty() {
                        self.editor.add_history_entry(entry)?;
                    }

                    if self.session.handle_line(&line)? == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }
        Ok(())
    }

    fn save_history(&self) {
        match self.session.history().lock() {
            Ok(history) => history.save(),
            Err(_) => warn!("history lock poisoned; history not saved"),
        }
    }
}
