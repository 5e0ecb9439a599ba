/*!
 * Typed result cells
 *
 * SQLite hands back one of five storage classes per value. They are mapped
 * onto a closed set of cell kinds so the renderers can match exhaustively.
 */

use rusqlite::types::ValueRef;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Declared column types whose text values are read as timestamps.
const TEMPORAL_DECL_TYPES: &[&str] = &["date", "datetime", "timestamp"];

const DATETIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// One column's value within one row.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Binary(Vec<u8>),
    Text(String),
    Number(Number),
    Timestamp(PrimitiveDateTime),
    /// Text that is not valid UTF-8, decoded lossily.
    Other(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{value}"),
            Number::Real(value) => write!(f, "{value}"),
        }
    }
}

impl Cell {
    /// Convert a raw SQLite value, using the column's declared type to
    /// recognise timestamps stored as text.
    pub fn from_value_ref(value: ValueRef<'_>, decl_type: Option<&str>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(value) => Cell::Number(Number::Integer(value)),
            ValueRef::Real(value) => Cell::Number(Number::Real(value)),
            ValueRef::Blob(bytes) => Cell::Binary(bytes.to_vec()),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => {
                    if decl_type.is_some_and(is_temporal) {
                        if let Some(timestamp) = parse_timestamp(text) {
                            return Cell::Timestamp(timestamp);
                        }
                    }
                    Cell::Text(text.to_owned())
                }
                Err(_) => Cell::Other(String::from_utf8_lossy(bytes).into_owned()),
            },
        }
    }
}

fn is_temporal(decl_type: &str) -> bool {
    let decl_type = decl_type.trim();
    TEMPORAL_DECL_TYPES
        .iter()
        .any(|temporal| decl_type.eq_ignore_ascii_case(temporal))
}

/// Parse the date/time spellings SQLite's date functions produce, plus
/// RFC 3339 with an offset. The offset is dropped; the wall-clock time is kept.
pub fn parse_timestamp(text: &str) -> Option<PrimitiveDateTime> {
    let text = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = PrimitiveDateTime::parse(text, format) {
            return Some(timestamp);
        }
    }
    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(PrimitiveDateTime::new(timestamp.date(), timestamp.time()));
    }
    Date::parse(text, DATE_FORMAT).ok().map(Date::midnight)
}
