/*!
 * Schema introspection
 *
 * Read-only lookups over `sqlite_master` and the table/index PRAGMAs, used
 * by the describe meta-commands and by completion.
 */

use super::{Database, DbError};
use rusqlite::params;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    /// `table` or `view`.
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexSummary {
    pub name: String,
    pub table: String,
}

/// One row of `PRAGMA table_info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
}

/// One row of `PRAGMA index_list`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    /// `c` (CREATE INDEX), `u` (UNIQUE constraint) or `pk` (primary key).
    pub origin: String,
}

/// One row of `PRAGMA foreign_key_list`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub from: String,
    pub table: String,
    /// `None` when the reference targets the parent's primary key implicitly.
    pub to: Option<String>,
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl Database {
    /// Every table in `sqlite_master`, in storage order, internal ones included.
    pub fn table_names(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
            .map_err(DbError::metadata("prepare table names query"))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(DbError::metadata("query table names"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata("collect table names"))
    }

    /// User tables and views, views first.
    pub fn relations(&self) -> Result<Vec<Relation>, DbError> {
        let mut stmt = self
            .conn()
            .prepare(
                "
                SELECT name, type
                FROM sqlite_master
                WHERE type IN ('table', 'view')
                  AND name NOT LIKE 'sqlite_%'
                ORDER BY type DESC, name
                ",
            )
            .map_err(DbError::metadata("failed to list relations"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Relation {
                    name: row.get(0)?,
                    kind: row.get(1)?,
                })
            })
            .map_err(DbError::metadata("failed to list relations"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata("failed to list relations"))
    }

    pub fn indexes(&self) -> Result<Vec<IndexSummary>, DbError> {
        let mut stmt = self
            .conn()
            .prepare(
                "
                SELECT name, tbl_name
                FROM sqlite_master
                WHERE type = 'index'
                  AND name NOT LIKE 'sqlite_%'
                ORDER BY tbl_name, name
                ",
            )
            .map_err(DbError::metadata("failed to list indexes"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(IndexSummary {
                    name: row.get(0)?,
                    table: row.get(1)?,
                })
            })
            .map_err(DbError::metadata("failed to list indexes"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata("failed to list indexes"))
    }

    /// Column metadata; empty when the table does not exist.
    pub fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
        let mut stmt = self
            .conn()
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))
            .map_err(DbError::metadata(format!("inspect columns for {table}")))?;
        let rows = stmt
            .query_map([], |row| {
                let not_null: i64 = row.get(3)?;
                Ok(ColumnInfo {
                    name: row.get(1)?,
                    column_type: row.get(2)?,
                    not_null: not_null != 0,
                    default_value: row.get(4)?,
                })
            })
            .map_err(DbError::metadata(format!("query column info for {table}")))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata(format!("collect columns for {table}")))
    }

    pub fn index_list(&self, table: &str) -> Result<Vec<IndexEntry>, DbError> {
        let mut stmt = self
            .conn()
            .prepare(&format!("PRAGMA index_list({})", quote_identifier(table)))
            .map_err(DbError::metadata(format!("inspect indexes for {table}")))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(IndexEntry {
                    name: row.get(1)?,
                    origin: row.get(3)?,
                })
            })
            .map_err(DbError::metadata(format!("query indexes for {table}")))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata(format!("collect indexes for {table}")))
    }

    /// Indexed column names in key order; expression keys are skipped.
    pub fn index_columns(&self, index: &str) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn()
            .prepare(&format!("PRAGMA index_info({})", quote_identifier(index)))
            .map_err(DbError::metadata(format!("inspect index {index}")))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<String>>(2))
            .map_err(DbError::metadata(format!("query index {index}")))?;
        let names = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata(format!("collect index {index}")))?;
        Ok(names.into_iter().flatten().collect())
    }

    pub fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>, DbError> {
        let mut stmt = self
            .conn()
            .prepare(&format!(
                "PRAGMA foreign_key_list({})",
                quote_identifier(table)
            ))
            .map_err(DbError::metadata(format!("inspect foreign keys for {table}")))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ForeignKey {
                    table: row.get(2)?,
                    from: row.get(3)?,
                    to: row.get(4)?,
                })
            })
            .map_err(DbError::metadata(format!("query foreign keys for {table}")))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata(format!("collect foreign keys for {table}")))
    }

    /// `CREATE TABLE` text for every table.
    pub fn schema_sql(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT sql FROM sqlite_master WHERE type = 'table'")
            .map_err(DbError::metadata("schema query failed"))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .map_err(DbError::metadata("schema query failed"))?;
        let statements = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbError::metadata("schema query failed"))?;
        Ok(statements.into_iter().flatten().collect())
    }

    /// `CREATE TABLE` text for one table.
    pub fn table_sql(&self, table: &str) -> Result<String, DbError> {
        let sql = self
            .conn()
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get::<_, Option<String>>(0),
            )
            .map_err(|source| match source {
                rusqlite::Error::QueryReturnedNoRows => DbError::NoSuchTable(table.to_owned()),
                source => DbError::Metadata {
                    context: format!("schema query for {table}"),
                    source,
                },
            })?;
        sql.ok_or_else(|| DbError::NoSuchTable(table.to_owned()))
    }
}
