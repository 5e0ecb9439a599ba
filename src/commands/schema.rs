/*!
 * Schema description commands: `\d <table>`, `\d`, `\di` and `.schema`.
 */

use crate::database::{Database, DbError, IndexEntry};
use crate::render::table::psql_table;
use anyhow::Result;
use std::io::Write;

const NAME_WIDTH: usize = 32;
const TYPE_WIDTH: usize = 6;
const RELATION_RULE_WIDTH: usize = 41;

/// Columns, indexes and foreign keys of one table. The index and foreign
/// key sections are only printed when non-empty.
pub fn describe_table(db: &Database, table: &str, out: &mut dyn Write) -> Result<()> {
    let columns = db.table_columns(table)?;
    if columns.is_empty() {
        return Err(DbError::NoSuchTable(table.to_string()).into());
    }

    writeln!(out, "\n📄 Table \"{table}\"\n")?;

    let mut grid = psql_table(["Column", "Type", "Collation", "Nullable", "Default"]);
    for column in columns {
        grid.add_row(vec![
            column.name,
            column.column_type,
            String::new(),
            if column.not_null { "no" } else { "yes" }.to_string(),
            column.default_value.unwrap_or_default(),
        ]);
    }
    writeln!(out, "{grid}")?;

    let indexes = db.index_list(table)?;
    if !indexes.is_empty() {
        let mut grid = psql_table(["Index Name", "Details"]);
        for index in &indexes {
            let columns = db.index_columns(&index.name)?;
            grid.add_row(vec![index.name.clone(), index_details(index, &columns)]);
        }
        writeln!(out, "\n🔖 Indexes")?;
        writeln!(out, "{grid}")?;
    }

    let foreign_keys = db.foreign_keys(table)?;
    if !foreign_keys.is_empty() {
        let mut grid = psql_table(["From", "To Table", "To Column"]);
        for key in foreign_keys {
            grid.add_row(vec![key.from, key.table, key.to.unwrap_or_default()]);
        }
        writeln!(out, "\n🔗 Foreign Keys")?;
        writeln!(out, "{grid}")?;
    }

    writeln!(out)?;
    Ok(())
}

/// e.g. `PRIMARY KEY (btree: id)`, `UNIQUE CONSTRAINT (btree: email)`.
fn index_details(index: &IndexEntry, columns: &[String]) -> String {
    let btree = format!("(btree: {})", columns.join(", "));
    match index.origin.as_str() {
        "pk" => format!("PRIMARY KEY {btree}"),
        "u" => format!("UNIQUE CONSTRAINT {btree}"),
        _ => btree,
    }
}

pub fn list_relations(db: &Database, out: &mut dyn Write) -> Result<()> {
    let relations = db.relations()?;

    writeln!(out, "        List of relations")?;
    writeln!(out, " {:<NAME_WIDTH$} | {:<TYPE_WIDTH$}", "Name", "Type")?;
    writeln!(out, "{}", "-".repeat(RELATION_RULE_WIDTH))?;
    for relation in relations {
        writeln!(
            out,
            " {:<NAME_WIDTH$} | {:<TYPE_WIDTH$}",
            relation.name, relation.kind
        )?;
    }
    Ok(())
}

pub fn list_indexes(db: &Database, out: &mut dyn Write) -> Result<()> {
    let mut grid = psql_table(["Index Name", "Table"]);
    for index in db.indexes()? {
        grid.add_row(vec![index.name, index.table]);
    }
    writeln!(out, "{grid}")?;
    Ok(())
}

/// `.schema`: every `CREATE TABLE` statement, or just the named table's.
pub fn schema_dump(db: &Database, table: Option<&str>, out: &mut dyn Write) -> Result<()> {
    match table {
        None => {
            for sql in db.schema_sql()? {
                writeln!(out, "{sql}")?;
            }
        }
        Some(table) => match db.table_sql(table) {
            Ok(sql) => writeln!(out, "{sql}")?,
            Err(DbError::NoSuchTable(_)) => writeln!(out, "No such table.")?,
            Err(error) => return Err(error.into()),
        },
    }
    Ok(())
}
