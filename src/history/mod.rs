/*!
 * Command history
 *
 * Every submitted command is kept in an in-memory log that is appended to
 * the history file on exit. Entries may span several lines, so the file
 * separates them with a sentinel line instead of one entry per line:
 *
 * ```text
 * ---
 * SELECT *
 * FROM users;
 * ---
 * \d users
 * ```
 *
 * Saving never rewrites the file; duplicates are folded when it is loaded.
 */

pub mod recall;
mod store;

pub use recall::{InquirePicker, RecallHandler};
pub use store::{HistoryStore, SharedHistory};

use std::collections::HashSet;
use std::fmt;

/// Line that precedes every entry in the history file.
pub const SENTINEL: &str = "---";

/// One submitted command, verbatim. Two entries are the same command when
/// their trimmed text is equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    text: String,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn identity(&self) -> &str {
        self.text.trim()
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Chronological list of entries, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(HistoryEntry::new(text));
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split file contents into entries, in file order. Lines before the
    /// first sentinel form an entry of their own; empty blocks are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut entries = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in contents.lines() {
            if line == SENTINEL {
                if !block.is_empty() {
                    entries.push(HistoryEntry::new(block.join("\n")));
                    block.clear();
                }
                continue;
            }
            block.push(line);
        }
        if !block.is_empty() {
            entries.push(HistoryEntry::new(block.join("\n")));
        }

        Self { entries }
    }

    /// Fold duplicates, see [`dedup`].
    pub fn deduplicated(self) -> Self {
        Self {
            entries: dedup(self.entries),
        }
    }

    /// File form of the whole log: a sentinel line before each entry and a
    /// newline after it.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(SENTINEL);
            out.push('\n');
            out.push_str(entry.text());
            if !entry.text().ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

/// Keep the most recent occurrence of each command, in the order those
/// occurrences were submitted. Entries that are blank once trimmed are
/// dropped; a kept entry keeps its original, untrimmed text.
pub fn dedup(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut seen = HashSet::new();
    let mut kept: Vec<HistoryEntry> = Vec::with_capacity(entries.len());

    for entry in entries.into_iter().rev() {
        let identity = entry.identity();
        if identity.is_empty() || seen.contains(identity) {
            continue;
        }
        seen.insert(identity.to_string());
        kept.push(entry);
    }

    kept.reverse();
    kept
}
