use super::value::format_value;
use super::RenderError;
use crate::database::ResultCursor;
use std::io::Write;

const RECORD_RULE_WIDTH: usize = 24;

/// Vertical layout, one block per row. All rows are buffered first because
/// the record-number width depends on the row count.
pub fn render_expanded(
    cursor: &mut dyn ResultCursor,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    let columns = cursor.columns().to_vec();

    let mut records: Vec<Vec<String>> = Vec::new();
    while let Some(row) = cursor.next_row()? {
        records.push(row.iter().map(format_value).collect());
    }

    if records.is_empty() {
        writeln!(out, "No rows found.")?;
        return Ok(());
    }

    let label_width = columns
        .iter()
        .map(|column| column.chars().count())
        .max()
        .unwrap_or(0);
    let digits = records.len().to_string().len();
    let rule = "-".repeat(RECORD_RULE_WIDTH);

    for (index, record) in records.iter().enumerate() {
        writeln!(out, "-[ RECORD {:>digits$} ]{rule}", index + 1)?;
        for (label, value) in columns.iter().zip(record) {
            writeln!(out, "{label:<label_width$} | {value}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
