/*!
 * Schema lookups used by the completion engine
 *
 * Every call goes to the live database; nothing is cached, so tables
 * created earlier in the session are offered immediately.
 */

use crate::database::{Database, DbError};

pub trait SchemaMetadata {
    /// All table names, in the order the catalog reports them.
    fn tables(&self) -> Result<Vec<String>, DbError>;

    /// Column names of `table` in declaration order.
    fn columns(&self, table: &str) -> Result<Vec<String>, DbError>;
}

impl SchemaMetadata for Database {
    fn tables(&self) -> Result<Vec<String>, DbError> {
        self.table_names()
    }

    fn columns(&self, table: &str) -> Result<Vec<String>, DbError> {
        Ok(self
            .table_columns(table)?
            .into_iter()
            .map(|column| column.name)
            .collect())
    }
}
