mod cell;
mod connection;
mod cursor;
mod error;
mod schema;

pub use cell::{Cell, Number};
pub use connection::{Database, Execution};
#[cfg(test)]
pub use cursor::MemoryCursor;
pub use cursor::{ResultCursor, SqliteCursor};
pub use error::DbError;
pub use schema::IndexEntry;
