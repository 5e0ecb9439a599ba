/*!
 * Context-aware completion
 *
 * Suggests table names and column names based on the text before the
 * cursor, using live schema lookups:
 * - `.schema`, `\d`, FROM, JOIN, INSERT INTO and UPDATE offer tables
 * - `table.` and `UPDATE table SET` offer that table's columns
 */

pub mod engine;
pub mod helper;
pub mod metadata;
pub mod suggestion;

pub use engine::CompletionEngine;
pub use helper::SqliteHelper;
