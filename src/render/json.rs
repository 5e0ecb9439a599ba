use super::value::format_timestamp;
use super::RenderError;
use crate::database::{Cell, Number, ResultCursor};
use serde_json::{Map, Value};
use std::io::Write;

/// Buffer every row into an ordered object and print the array pretty.
pub fn render_json(cursor: &mut dyn ResultCursor, out: &mut dyn Write) -> Result<(), RenderError> {
    let columns = cursor.columns().to_vec();

    let mut records = Vec::new();
    while let Some(row) = cursor.next_row()? {
        let mut record = Map::with_capacity(columns.len());
        for (column, cell) in columns.iter().zip(row) {
            record.insert(column.clone(), json_value(cell));
        }
        records.push(Value::Object(record));
    }

    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

pub fn json_value(cell: Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Binary(bytes) => Value::String(binary_text(&bytes)),
        Cell::Text(text) | Cell::Other(text) => Value::String(text),
        Cell::Number(Number::Integer(value)) => Value::from(value),
        Cell::Number(Number::Real(value)) => serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Timestamp(timestamp) => Value::String(format_timestamp(&timestamp)),
    }
}

/// Printable ASCII blobs read as text; anything else as `\x` plus uppercase hex.
fn binary_text(bytes: &[u8]) -> String {
    if bytes.iter().all(|byte| (32..=126).contains(byte)) {
        bytes.iter().map(|&byte| char::from(byte)).collect()
    } else {
        format!("\\x{}", hex::encode_upper(bytes))
    }
}
