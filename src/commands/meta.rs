/*!
 * Line classification
 *
 * Decides whether a submitted line is one of the built-in commands or a
 * statement for the engine. Checks run in a fixed order and the first match
 * wins.
 */

pub const HELP_TEXT: &str = r"Enter SQL statements. Built-in commands:
    \x             → toggle expanded display
    \j             → toggle JSON output
    \d [table]     → show table schema
    \d             → list all tables/views
    \di            → list all indexes
    .schema [name] → print CREATE TABLE statements
    \? or \h       → show this help
    CTRL+R         → fuzzy search history
    exit, \q       → quit (CTRL+D also works)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    ToggleExpanded,
    ToggleJson,
    /// `\d <table>`
    Describe(&'a str),
    /// `\d` followed only by a `;`
    DescribeUsage,
    ListRelations,
    ListIndexes,
    /// `.schema` with an optional table name.
    SchemaDump(Option<&'a str>),
    Help,
    Statement(&'a str),
}

/// Classify an already trimmed, non-empty line.
pub fn classify(line: &str) -> Command<'_> {
    match line {
        "exit" | r"\q" => return Command::Exit,
        r"\x" => return Command::ToggleExpanded,
        r"\j" => return Command::ToggleJson,
        _ => {}
    }

    if let Some(rest) = line.strip_prefix(r"\d ") {
        let table = rest.strip_suffix(';').unwrap_or(rest).trim();
        return if table.is_empty() {
            Command::DescribeUsage
        } else {
            Command::Describe(table)
        };
    }

    match line {
        r"\d" | r"\d;" => return Command::ListRelations,
        r"\di" | r"\di;" => return Command::ListIndexes,
        _ => {}
    }

    if line.starts_with(".schema") {
        return Command::SchemaDump(line.split_whitespace().nth(1));
    }

    match line {
        r"\?" | r"\h" => Command::Help,
        _ => Command::Statement(line),
    }
}
