/*!
 * Line editor helper
 *
 * Wires the completion engine into rustyline: Tab completion, inline
 * hints, bracket matching, and multi-line continuation while parentheses
 * are unbalanced.
 */

use super::engine::CompletionEngine;
use super::metadata::SchemaMetadata;
use crate::database::Database;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::{self, MatchingBracketValidator, Validator};
use rustyline::Context;
use std::borrow::Cow;
use std::rc::Rc;

pub struct SqliteHelper {
    database: Rc<Database>,
    engine: CompletionEngine,
    highlighter: MatchingBracketHighlighter,
    validator: MatchingBracketValidator,
    hinter: HistoryHinter,
}

impl SqliteHelper {
    pub fn new(database: Rc<Database>, engine: CompletionEngine) -> Self {
        Self {
            database,
            engine,
            highlighter: MatchingBracketHighlighter::new(),
            validator: MatchingBracketValidator::new(),
            hinter: HistoryHinter::new(),
        }
    }

    fn metadata(&self) -> &dyn SchemaMetadata {
        self.database.as_ref()
    }
}

/// Byte offset where the identifier ending at `pos` begins.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(index, c)| index + c.len_utf8())
        .unwrap_or(0)
}

impl Completer for SqliteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let start = word_start(line, pos);
        let completions = self
            .engine
            .suggest(&line[..pos], self.metadata())
            .into_iter()
            .map(|suggestion| Pair {
                display: suggestion.format_display(),
                replacement: suggestion.text,
            })
            .collect();

        Ok((start, completions))
    }
}

impl Hinter for SqliteHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if let Some(history_hint) = self.hinter.hint(line, pos, ctx) {
            return Some(history_hint);
        }

        // Only hint at the end of the line, and only for a started word.
        if pos < line.len() {
            return None;
        }
        let word = &line[word_start(line, pos)..pos];
        if word.is_empty() {
            return None;
        }

        let top = self
            .engine
            .suggest(line, self.metadata())
            .into_iter()
            .next()?;
        // Exact-case continuations only.
        top.text
            .strip_prefix(word)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Highlighter for SqliteHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Borrowed(prompt)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[90m{hint}\x1b[0m"))
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}

impl Validator for SqliteHelper {
    fn validate(
        &self,
        ctx: &mut validate::ValidationContext,
    ) -> Result<validate::ValidationResult, ReadlineError> {
        self.validator.validate(ctx)
    }

    fn validate_while_typing(&self) -> bool {
        self.validator.validate_while_typing()
    }
}

impl rustyline::Helper for SqliteHelper {}
