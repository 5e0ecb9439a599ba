/*!
 * Fuzzy history recall (Ctrl-R)
 */

use super::{HistoryEntry, SharedHistory};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use inquire::error::InquireError;
use inquire::Select;
use rustyline::{Cmd, ConditionalEventHandler, Event, EventContext, Movement, RepeatCount};
use std::fmt;
use tracing::debug;

const PROMPT: &str = "🔍 history>";
const PAGE_SIZE: usize = 15;

/// Interactive chooser over the history list.
pub trait HistoryPicker {
    /// Index of the chosen entry, or `None` when the user cancelled.
    fn pick(&self, entries: &[HistoryEntry]) -> anyhow::Result<Option<usize>>;
}

/// Let the user pick an entry; returns its full text.
pub fn fuzzy_recall(entries: &[HistoryEntry], picker: &dyn HistoryPicker) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    match picker.pick(entries) {
        Ok(choice) => choice
            .and_then(|index| entries.get(index))
            .map(|entry| entry.text().to_string()),
        Err(error) => {
            debug!(%error, "history picker failed");
            None
        }
    }
}

/// Skim-style fuzzy score of `text` against the typed filter. An empty
/// filter matches everything equally so the list keeps its order.
pub fn fuzzy_score(matcher: &SkimMatcherV2, filter: &str, text: &str) -> Option<i64> {
    if filter.is_empty() {
        return Some(0);
    }
    matcher.fuzzy_match(text, filter)
}

/// List item for the picker; multi-line entries are shown on one line.
struct RecallOption {
    index: usize,
    label: String,
}

impl fmt::Display for RecallOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Full-screen fuzzy select, oldest entry first with the cursor on the newest.
pub struct InquirePicker;

impl HistoryPicker for InquirePicker {
    fn pick(&self, entries: &[HistoryEntry]) -> anyhow::Result<Option<usize>> {
        let options: Vec<RecallOption> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| RecallOption {
                index,
                label: entry.text().replace('\n', " ↵ "),
            })
            .collect();
        let newest = options.len().saturating_sub(1);

        let matcher = SkimMatcherV2::default().ignore_case();
        let scorer = |filter: &str, _: &RecallOption, label: &str, _: usize| {
            fuzzy_score(&matcher, filter, label)
        };

        let answer = Select::new(PROMPT, options)
            .with_scorer(&scorer)
            .with_starting_cursor(newest)
            .with_page_size(PAGE_SIZE)
            .raw_prompt();

        match answer {
            Ok(choice) => Ok(Some(choice.value.index)),
            Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

/// Key handler that runs the picker and splices the chosen entry in place
/// of the text before the cursor.
pub struct RecallHandler<P> {
    history: SharedHistory,
    picker: P,
}

impl<P> RecallHandler<P>
where
    P: HistoryPicker,
{
    pub fn new(history: SharedHistory, picker: P) -> Self {
        Self { history, picker }
    }

    fn recall(&self) -> Option<String> {
        // Copy the list out so the lock is not held while the picker runs.
        let entries = match self.history.lock() {
            Ok(store) => store.entries().to_vec(),
            Err(_) => return None,
        };
        fuzzy_recall(&entries, &self.picker)
    }

    /// Multi-line buffers are replaced from the start of the buffer, not
    /// just the current line.
    fn command(&self) -> Cmd {
        match self.recall() {
            Some(text) => Cmd::Replace(Movement::BeginningOfBuffer, Some(text)),
            None => Cmd::Repaint,
        }
    }
}

impl<P> ConditionalEventHandler for RecallHandler<P>
where
    P: HistoryPicker + Send + Sync,
{
    fn handle(&self, _: &Event, _: RepeatCount, _: bool, _: &EventContext) -> Option<Cmd> {
        Some(self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStore;
    use anyhow::anyhow;
    use rustyline::line_buffer::{ChangeListener, DeleteListener, Direction, LineBuffer};

    struct FixedPicker(Option<usize>);

    impl HistoryPicker for FixedPicker {
        fn pick(&self, _: &[HistoryEntry]) -> anyhow::Result<Option<usize>> {
            Ok(self.0)
        }
    }

    struct FailingPicker;

    impl HistoryPicker for FailingPicker {
        fn pick(&self, _: &[HistoryEntry]) -> anyhow::Result<Option<usize>> {
            Err(anyhow!("no terminal"))
        }
    }

    /// Fails the test if the picker is shown at all.
    struct UnreachablePicker;

    impl HistoryPicker for UnreachablePicker {
        fn pick(&self, _: &[HistoryEntry]) -> anyhow::Result<Option<usize>> {
            panic!("picker shown for an empty history");
        }
    }

    fn entries(texts: &[&str]) -> Vec<HistoryEntry> {
        texts.iter().map(|text| HistoryEntry::new(*text)).collect()
    }

    fn shared(texts: &[&str]) -> SharedHistory {
        let mut store = HistoryStore::in_memory();
        for text in texts {
            store.record(*text);
        }
        store.into_shared()
    }

    #[test]
    fn returns_the_full_text_of_the_pick() {
        let list = entries(&["SELECT 1", "SELECT *\nFROM users"]);
        assert_eq!(
            fuzzy_recall(&list, &FixedPicker(Some(1))),
            Some("SELECT *\nFROM users".to_string())
        );
    }

    #[test]
    fn cancel_and_errors_return_nothing() {
        let list = entries(&["SELECT 1"]);
        assert_eq!(fuzzy_recall(&list, &FixedPicker(None)), None);
        assert_eq!(fuzzy_recall(&list, &FailingPicker), None);
        assert_eq!(fuzzy_recall(&list, &FixedPicker(Some(7))), None);
    }

    #[test]
    fn empty_history_skips_the_picker() {
        assert_eq!(fuzzy_recall(&[], &UnreachablePicker), None);
    }

    #[test]
    fn scoring_prefers_closer_matches() {
        let matcher = SkimMatcherV2::default().ignore_case();
        assert_eq!(fuzzy_score(&matcher, "", "anything"), Some(0));
        assert!(fuzzy_score(&matcher, "selusr", "SELECT * FROM users").is_some());
        assert!(fuzzy_score(&matcher, "zzz", "SELECT * FROM users").is_none());
    }

    #[test]
    fn handler_replaces_text_before_cursor() {
        let handler = RecallHandler::new(shared(&["SELECT 1", "\\x"]), FixedPicker(Some(0)));
        match handler.command() {
            Cmd::Replace(Movement::BeginningOfBuffer, Some(text)) => assert_eq!(text, "SELECT 1"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn handler_repaints_when_nothing_was_chosen() {
        let handler = RecallHandler::new(shared(&["SELECT 1"]), FixedPicker(None));
        assert!(matches!(handler.command(), Cmd::Repaint));
    }

    /// Edit listener that ignores every notification.
    struct Quiet;

    impl DeleteListener for Quiet {
        fn delete(&mut self, _: usize, _: &str, _: Direction) {}
    }

    impl ChangeListener for Quiet {
        fn insert_char(&mut self, _: usize, _: char) {}
        fn insert_str(&mut self, _: usize, _: &str) {}
        fn replace(&mut self, _: usize, _: &str, _: &str) {}
    }

    #[test]
    fn recall_replaces_every_line_of_a_multi_line_buffer() {
        let handler = RecallHandler::new(shared(&["SELECT 1"]), FixedPicker(Some(0)));
        let Cmd::Replace(movement, Some(text)) = handler.command() else {
            panic!("expected a replace command");
        };

        let typed = "SELECT (\n  a";
        let mut buffer = LineBuffer::with_capacity(64);
        buffer.update(typed, typed.len(), &mut Quiet);
        buffer.kill(&movement, &mut Quiet);
        buffer.insert_str(buffer.pos(), &text, &mut Quiet);
        assert_eq!(buffer.as_str(), "SELECT 1");
    }
}
