use crate::database::Cell;
use time::PrimitiveDateTime;

/// Display form shared by the table and expanded modes.
pub fn format_value(cell: &Cell) -> String {
    match cell {
        Cell::Null => "NULL".to_string(),
        Cell::Binary(bytes) => format!("\\x{}", hex::encode_upper(bytes)),
        Cell::Timestamp(timestamp) => format_timestamp(timestamp),
        Cell::Text(text) | Cell::Other(text) => text.clone(),
        Cell::Number(number) => number.to_string(),
    }
}

/// `YYYY-MM-DD HH:MM:SS.ffffff`, microseconds truncated.
pub fn format_timestamp(timestamp: &PrimitiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
        timestamp.year(),
        u8::from(timestamp.month()),
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
        timestamp.microsecond()
    )
}

/// Whether a formatted value reads as a number for alignment purposes.
pub fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Number;
    use time::macros::datetime;

    #[test]
    fn null_prints_marker() {
        assert_eq!(format_value(&Cell::Null), "NULL");
    }

    #[test]
    fn binary_prints_uppercase_hex() {
        assert_eq!(format_value(&Cell::Binary(vec![0xde, 0xad, 0x01])), "\\xDEAD01");
        assert_eq!(format_value(&Cell::Binary(Vec::new())), "\\x");
    }

    #[test]
    fn timestamps_print_six_fraction_digits() {
        let cell = Cell::Timestamp(datetime!(2024-03-09 07:08:09.123456789));
        assert_eq!(format_value(&cell), "2024-03-09 07:08:09.123456");

        let whole = Cell::Timestamp(datetime!(2024-03-09 07:08:09));
        assert_eq!(format_value(&whole), "2024-03-09 07:08:09.000000");
    }

    #[test]
    fn other_kinds_use_default_form() {
        assert_eq!(format_value(&Cell::Number(Number::Integer(42))), "42");
        assert_eq!(format_value(&Cell::Number(Number::Real(0.5))), "0.5");
        assert_eq!(format_value(&Cell::Text("abc".to_string())), "abc");
        assert_eq!(format_value(&Cell::Other("x\u{fffd}".to_string())), "x\u{fffd}");
    }

    #[test]
    fn numeric_detection_requires_a_full_parse() {
        assert!(is_numeric("42"));
        assert!(is_numeric("3.14"));
        assert!(is_numeric("-1e3"));
        assert!(!is_numeric("42abc"));
        assert!(!is_numeric("NULL"));
        assert!(!is_numeric(""));
    }
}
