/*!
 * Result rendering
 *
 * Three mutually exclusive output modes for a forward-only result cursor:
 * - Table: psql-style grid, streamed with a one-row lookahead
 * - Expanded: one vertical record block per row
 * - JSON: an array of objects, 2-space indented
 */

pub mod expanded;
pub mod json;
pub mod table;
pub mod value;

use crate::database::{DbError, ResultCursor};
use serde::Deserialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// The active output format. Being a single enum, only one can be on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Table,
    Expanded,
    Json,
}

impl RenderMode {
    /// `\x`: expanded on (clearing JSON), or back to the table when already on.
    pub fn toggle_expanded(self) -> Self {
        match self {
            RenderMode::Expanded => RenderMode::Table,
            _ => RenderMode::Expanded,
        }
    }

    /// `\j`: JSON on (clearing expanded), or back to the table when already on.
    pub fn toggle_json(self) -> Self {
        match self {
            RenderMode::Json => RenderMode::Table,
            _ => RenderMode::Json,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == RenderMode::Expanded
    }

    pub fn is_json(self) -> bool {
        self == RenderMode::Json
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Table => "table",
            RenderMode::Expanded => "expanded",
            RenderMode::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for RenderMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(RenderMode::Table),
            "expanded" => Ok(RenderMode::Expanded),
            "json" => Ok(RenderMode::Json),
            other => Err(anyhow::anyhow!(
                "unknown display mode {other:?}; expected table, expanded or json"
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Scan(#[from] DbError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Render the cursor in exactly one mode.
pub fn render(
    mode: RenderMode,
    cursor: &mut dyn ResultCursor,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    match mode {
        RenderMode::Table => table::render_table(cursor, out),
        RenderMode::Expanded => expanded::render_expanded(cursor, out),
        RenderMode::Json => json::render_json(cursor, out),
    }
}
