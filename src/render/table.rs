use super::value::{format_value, is_numeric};
use super::RenderError;
use crate::database::ResultCursor;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use std::io::Write;

/// psql look: `|` between columns, `-` and `+` under the header, no outer frame.
const PSQL_STYLE: &str = "     -+ |          ";

/// A comfy-table grid in the psql style with a lower-cased header.
pub fn psql_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = Table::new();
    table
        .load_preset(PSQL_STYLE)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|column| column.as_ref().to_lowercase())
                .collect::<Vec<_>>(),
        );
    table
}

/// Stream the cursor into a grid. The first row decides which columns are
/// right-aligned; later rows are not re-checked. An empty result prints the
/// header alone.
pub fn render_table(cursor: &mut dyn ResultCursor, out: &mut dyn Write) -> Result<(), RenderError> {
    let mut table = psql_table(cursor.columns());

    if let Some(first) = cursor.next_row()? {
        let sample: Vec<String> = first.iter().map(format_value).collect();
        for (index, value) in sample.iter().enumerate() {
            if is_numeric(value) {
                if let Some(column) = table.column_mut(index) {
                    column.set_cell_alignment(CellAlignment::Right);
                }
            }
        }
        table.add_row(sample);

        while let Some(row) = cursor.next_row()? {
            table.add_row(row.iter().map(format_value).collect::<Vec<_>>());
        }
    }

    writeln!(out, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Cell, Database, Execution, MemoryCursor, Number};
    use anyhow::Result;

    fn rendered(cursor: &mut dyn ResultCursor) -> Result<Vec<String>> {
        let mut out = Vec::new();
        render_table(cursor, &mut out)?;
        Ok(String::from_utf8(out)?
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect())
    }

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn select_literal_renders_header_and_row() -> Result<()> {
        let db = Database::open_in_memory()?;
        let Execution::Rows(lines) = db.execute("SELECT 1 AS a, 'x' AS b;", rendered)? else {
            panic!("expected rows");
        };
        let lines = lines?;
        assert_eq!(lines[0].trim(), "a | b");
        assert_eq!(lines[1].trim(), "---+---");
        assert_eq!(lines[2].trim(), "1 | x");
        assert_eq!(lines.len(), 3);
        Ok(())
    }

    #[test]
    fn numeric_first_row_right_aligns_the_column() -> Result<()> {
        let db = Database::open_in_memory()?;
        let Execution::Rows(lines) = db.execute("SELECT 1 AS amount, 'x' AS b", rendered)? else {
            panic!("expected rows");
        };
        let lines = lines?;
        assert_eq!(lines[2], "      1 | x");
        Ok(())
    }

    #[test]
    fn alignment_sticks_even_when_later_rows_are_text() -> Result<()> {
        let mut cursor = MemoryCursor::new(
            &["n", "label"],
            vec![
                vec![text("42"), text("a")],
                vec![text("hello"), text("b")],
            ],
        );
        let lines = rendered(&mut cursor)?;
        assert_eq!(lines[2], "    42 | a");
        assert_eq!(lines[3], " hello | b");
        Ok(())
    }

    #[test]
    fn text_first_row_keeps_left_alignment() -> Result<()> {
        let mut cursor = MemoryCursor::new(
            &["word"],
            vec![
                vec![text("ab")],
                vec![Cell::Number(Number::Integer(12345))],
            ],
        );
        let lines = rendered(&mut cursor)?;
        assert_eq!(lines[2], " ab");
        assert_eq!(lines[3], " 12345");
        Ok(())
    }

    #[test]
    fn header_is_lower_cased() -> Result<()> {
        let mut cursor = MemoryCursor::new(&["UserName"], vec![vec![text("ann")]]);
        let lines = rendered(&mut cursor)?;
        assert_eq!(lines[0].trim(), "username");
        Ok(())
    }

    #[test]
    fn empty_result_prints_only_the_header() -> Result<()> {
        let mut cursor = MemoryCursor::new(&["id", "name"], Vec::new());
        let output = rendered(&mut cursor)?.join("\n");
        assert!(output.contains("id"));
        assert!(output.contains("name"));
        assert!(!output.to_lowercase().contains("no rows"));
        Ok(())
    }

    #[test]
    fn null_and_binary_cells_use_the_formatter() -> Result<()> {
        let mut cursor =
            MemoryCursor::new(&["a", "b"], vec![vec![Cell::Null, Cell::Binary(vec![0xab])]]);
        let lines = rendered(&mut cursor)?;
        assert_eq!(lines[2].trim(), "NULL | \\xAB");
        Ok(())
    }
}
