use super::{Cell, DbError};
use rusqlite::Rows;

/// A forward-only result set: column names up front, rows pulled one at a time.
pub trait ResultCursor {
    fn columns(&self) -> &[String];

    /// Advance to the next row; `Ok(None)` once the result set is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Cell>>, DbError>;
}

pub struct SqliteCursor<'stmt> {
    columns: Vec<String>,
    decl_types: Vec<Option<String>>,
    rows: Rows<'stmt>,
}

impl<'stmt> SqliteCursor<'stmt> {
    pub fn new(columns: Vec<String>, decl_types: Vec<Option<String>>, rows: Rows<'stmt>) -> Self {
        Self {
            columns,
            decl_types,
            rows,
        }
    }
}

impl ResultCursor for SqliteCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<Cell>>, DbError> {
        let Some(row) = self.rows.next().map_err(DbError::Step)? else {
            return Ok(None);
        };

        let mut cells = Vec::with_capacity(self.columns.len());
        for (index, decl_type) in self.decl_types.iter().enumerate() {
            let value = row.get_ref(index).map_err(DbError::Step)?;
            cells.push(Cell::from_value_ref(value, decl_type.as_deref()));
        }
        Ok(Some(cells))
    }
}

/// In-memory cursor for renderer tests.
#[cfg(test)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: std::collections::VecDeque<Vec<Cell>>,
}

#[cfg(test)]
impl MemoryCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: rows.into(),
        }
    }
}

#[cfg(test)]
impl ResultCursor for MemoryCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<Cell>>, DbError> {
        Ok(self.rows.pop_front())
    }
}
