/*!
 * Context-aware completion engine
 *
 * The text before the cursor is matched against a fixed, ordered rule
 * table. The first rule that matches decides whether tables or the
 * columns of one table are offered, and which captured fragment is the
 * prefix being typed.
 */

use super::metadata::SchemaMetadata;
use super::suggestion::Suggestion;
use regex::{Captures, Regex};
use tracing::debug;

/// Tables with this prefix belong to the engine and are never offered.
const INTERNAL_PREFIX: &str = "sqlite_";

/// Where a rule's suggestions come from, by capture-group index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Tables { prefix: usize },
    Columns { table: usize, prefix: usize },
}

/// Most specific first.
const RULES: &[(&str, &str, Source)] = &[
    (
        "schema-table",
        r"(?i)^\.schema\s+(\w*)$",
        Source::Tables { prefix: 1 },
    ),
    (
        "describe-table",
        r"(?i)^\\d\s+(\w+)$",
        Source::Tables { prefix: 1 },
    ),
    (
        "dotted-column",
        r"(?i)(\w+)\.(\w*)$",
        Source::Columns {
            table: 1,
            prefix: 2,
        },
    ),
    (
        "select-from",
        r"(?i)\bSELECT\b.*\bFROM\s+(\w*)$",
        Source::Tables { prefix: 1 },
    ),
    (
        "insert-into",
        r"(?i)\bINSERT\s+INTO\s+(\w*)$",
        Source::Tables { prefix: 1 },
    ),
    (
        "update-set",
        r"(?i)^UPDATE(?:\s+OR\s+(?:ROLLBACK|ABORT|REPLACE|FAIL|IGNORE))?\s+(\w+)\s+SET\s+(?:[^=]+=\s*[^,]+,\s*)*(\w*)$",
        Source::Columns {
            table: 1,
            prefix: 2,
        },
    ),
    (
        "update-table",
        r"(?i)\bUPDATE\s+(\w*)$",
        Source::Tables { prefix: 1 },
    ),
    (
        "from-join",
        r"(?i)\b(?:FROM|JOIN)\s+(\w*)$",
        Source::Tables { prefix: 1 },
    ),
];

/// A compiled context pattern paired with its suggestion source.
#[derive(Debug)]
pub struct CompletionRule {
    name: &'static str,
    pattern: Regex,
    source: Source,
}

#[derive(Debug)]
pub struct CompletionEngine {
    rules: Vec<CompletionRule>,
}

impl CompletionEngine {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = RULES
            .iter()
            .map(|&(name, pattern, source)| {
                Ok(CompletionRule {
                    name,
                    pattern: Regex::new(pattern)?,
                    source,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// Suggestions for the text before the cursor. No matching rule, or a
    /// failed schema lookup, yields an empty list.
    pub fn suggest(&self, text: &str, metadata: &dyn SchemaMetadata) -> Vec<Suggestion> {
        let Some((rule, captures)) = self.first_match(text) else {
            return Vec::new();
        };

        match rule.source {
            Source::Tables { prefix } => {
                let prefix = group(&captures, prefix);
                match metadata.tables() {
                    Ok(tables) => tables
                        .into_iter()
                        .filter(|name| !name.starts_with(INTERNAL_PREFIX))
                        .filter(|name| has_prefix(name, prefix))
                        .map(Suggestion::table)
                        .collect(),
                    Err(error) => {
                        debug!(rule = rule.name, %error, "table lookup failed");
                        Vec::new()
                    }
                }
            }
            Source::Columns { table, prefix } => {
                let table = group(&captures, table);
                let prefix = group(&captures, prefix);
                match metadata.columns(table) {
                    Ok(columns) => columns
                        .into_iter()
                        .filter(|name| has_prefix(name, prefix))
                        .map(Suggestion::column)
                        .collect(),
                    Err(error) => {
                        debug!(rule = rule.name, table, %error, "column lookup failed");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Name of the rule that would handle `text`, if any.
    #[cfg(test)]
    pub fn matching_rule(&self, text: &str) -> Option<&'static str> {
        self.first_match(text).map(|(rule, _)| rule.name)
    }

    fn first_match<'t>(&self, text: &'t str) -> Option<(&CompletionRule, Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pattern.captures(text).map(|captures| (rule, captures)))
    }
}

fn group<'t>(captures: &Captures<'t>, index: usize) -> &'t str {
    captures.get(index).map_or("", |m| m.as_str())
}

fn has_prefix(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
