use super::{DbError, ResultCursor, SqliteCursor};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

pub struct Database {
    conn: Connection,
}

/// What running a statement produced.
#[derive(Debug)]
pub enum Execution<T> {
    /// The statement returned columns; the value is whatever the row consumer produced.
    Rows(T),
    /// The statement returned no columns and ran to completion.
    Changed { rows: usize },
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run one statement. Row-returning statements are handed to `on_rows`
    /// as a forward-only cursor; anything else is stepped to completion.
    pub fn execute<T>(
        &self,
        query: &str,
        on_rows: impl FnOnce(&mut dyn ResultCursor) -> T,
    ) -> Result<Execution<T>, DbError> {
        let mut stmt = self.conn.prepare(query).map_err(DbError::Prepare)?;

        // Comment-only input compiles to no statement at all.
        if stmt.expanded_sql().is_none() {
            debug!("empty statement");
            return Ok(Execution::Changed { rows: 0 });
        }

        if stmt.column_count() == 0 {
            let rows = stmt.execute([]).map_err(DbError::Step)?;
            return Ok(Execution::Changed { rows });
        }

        let (columns, decl_types): (Vec<String>, Vec<Option<String>>) = stmt
            .columns()
            .iter()
            .map(|column| {
                (
                    column.name().to_owned(),
                    column.decl_type().map(str::to_owned),
                )
            })
            .unzip();

        let rows = stmt.query([]).map_err(DbError::Step)?;
        let mut cursor = SqliteCursor::new(columns, decl_types, rows);
        Ok(Execution::Rows(on_rows(&mut cursor)))
    }
}
