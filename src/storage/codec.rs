//! Fixed-width record codec
//!
//! Layout per column type:
//! - `Int`, `Date`: 4 bytes, signed 32-bit, little-endian
//! - `Char(n)`: exactly `n` bytes of UTF-8, right-padded with NUL (`0x00`)
//!
//! Rows are the concatenation of their columns in schema order.

use crate::error::{Result, StorageError};
use crate::types::{FieldType, RowRecord, TableSchema, Value};

/// Padding byte for `Char(n)` values shorter than `n`
pub const CHAR_PAD: u8 = 0x00;

/// Sum of per-column widths
pub fn row_byte_size(schema: &TableSchema) -> u32 {
    schema.row_byte_size()
}

/// Prefix sum of the widths of the columns before `column`
pub fn offset_of(schema: &TableSchema, column: &str) -> Result<u32> {
    schema.offset_of(column)
}

/// Decode one value. Reads exactly `field_type.width()` bytes from the start of `bytes`.
pub fn decode(field_type: FieldType, bytes: &[u8]) -> Result<Value> {
    let width = field_type.width() as usize;
    let raw = bytes.get(..width).ok_or_else(|| {
        StorageError::Corruption(format!(
            "need {} bytes to decode {}, have {}",
            width,
            field_type,
            bytes.len()
        ))
    })?;

    match field_type {
        FieldType::Int | FieldType::Date => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(raw);
            Ok(Value::Integer(i32::from_le_bytes(buf) as i64))
        }
        FieldType::Char(_) => {
            let end = raw
                .iter()
                .rposition(|b| *b != CHAR_PAD)
                .map_or(0, |last| last + 1);
            let text = std::str::from_utf8(&raw[..end]).map_err(|e| {
                StorageError::Corruption(format!("invalid UTF-8 in {} value: {}", field_type, e))
            })?;
            Ok(Value::Text(text.to_string()))
        }
    }
}

/// Encode one value into exactly `field_type.width()` bytes.
///
/// Text longer than `n` bytes is truncated on a character boundary.
pub fn encode(field_type: FieldType, value: &Value) -> Result<Vec<u8>> {
    match (field_type, value) {
        (FieldType::Int | FieldType::Date, Value::Integer(v)) => {
            let v = i32::try_from(*v).map_err(|_| StorageError::ValueOutOfRange {
                value: *v,
                field_type: field_type.to_string(),
            })?;
            Ok(v.to_le_bytes().to_vec())
        }
        (FieldType::Char(n), Value::Text(s)) => {
            let width = n as usize;
            let mut cut = s.len().min(width);
            while !s.is_char_boundary(cut) {
                cut -= 1;
            }

            let mut out = Vec::with_capacity(width);
            out.extend_from_slice(&s.as_bytes()[..cut]);
            out.resize(width, CHAR_PAD);
            Ok(out)
        }
        (field_type, value) => Err(StorageError::TypeMismatch {
            column: String::new(),
            expected: field_type.to_string(),
            found: value.kind().to_string(),
        }),
    }
}

/// Encode a full row. Every schema column must be given; extra names are rejected.
pub fn encode_row(schema: &TableSchema, values: &[(&str, Value)]) -> Result<Vec<u8>> {
    if let Some((name, _)) = values.iter().find(|(name, _)| !schema.has_column(name)) {
        return Err(StorageError::UnknownColumn(name.to_string()));
    }

    let mut row = Vec::with_capacity(schema.row_byte_size() as usize);
    for column in schema.columns() {
        let value = values
            .iter()
            .find(|(name, _)| *name == column.name)
            .map(|(_, value)| value)
            .ok_or_else(|| {
                StorageError::InvalidArgument(format!("missing value for column '{}'", column.name))
            })?;

        let bytes = encode(column.field_type, value).map_err(|e| with_column(e, &column.name))?;
        row.extend_from_slice(&bytes);
    }

    Ok(row)
}

/// Decode the named columns of one row
pub fn decode_row(schema: &TableSchema, row: &[u8], columns: &[&str]) -> Result<RowRecord> {
    let mut record = RowRecord::with_capacity(columns.len());
    for name in columns {
        record.insert(*name, decode_column(schema, row, name)?);
    }
    Ok(record)
}

/// Decode a single named column of one row
pub fn decode_column(schema: &TableSchema, row: &[u8], column: &str) -> Result<Value> {
    let (def, offset) = schema
        .get_column(column)
        .ok_or_else(|| StorageError::UnknownColumn(column.to_string()))?;
    let field_bytes = row.get(offset as usize..).unwrap_or(&[]);
    decode(def.field_type, field_bytes)
}

fn with_column(err: StorageError, column: &str) -> StorageError {
    match err {
        StorageError::TypeMismatch { expected, found, .. } => StorageError::TypeMismatch {
            column: column.to_string(),
            expected,
            found,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnDef;

    fn user() -> TableSchema {
        TableSchema::new(
            "User",
            vec![
                ColumnDef::new("id", FieldType::Int),
                ColumnDef::new("age", FieldType::Int),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_user_row_round_trip() {
        let schema = user();
        let row = encode_row(&schema, &[("id", Value::Integer(2)), ("age", Value::Integer(24))]).unwrap();
        assert_eq!(row.len(), 8);
        assert_eq!(row, vec![2, 0, 0, 0, 24, 0, 0, 0]);

        let record = decode_row(&schema, &row, &["id", "age"]).unwrap();
        let expected: RowRecord = vec![("id", Value::Integer(2)), ("age", Value::Integer(24))]
            .into_iter()
            .collect();
        assert_eq!(record, expected);
    }

    #[test]
    fn test_int_little_endian_signed() {
        assert_eq!(decode(FieldType::Int, &[0xff, 0xff, 0xff, 0xff]).unwrap(), Value::Integer(-1));
        assert_eq!(decode(FieldType::Date, &[0x01, 0x02, 0, 0]).unwrap(), Value::Integer(0x0201));
        assert_eq!(encode(FieldType::Int, &Value::Integer(i32::MIN as i64)).unwrap(), vec![0, 0, 0, 0x80]);
    }

    #[test]
    fn test_int_out_of_range() {
        let result = encode(FieldType::Int, &Value::Integer(i32::MAX as i64 + 1));
        assert!(matches!(result, Err(StorageError::ValueOutOfRange { .. })));
    }

    #[test]
    fn test_char_padding_and_trim() {
        let bytes = encode(FieldType::Char(6), &Value::from("Bob")).unwrap();
        assert_eq!(bytes, b"Bob\0\0\0".to_vec());
        assert_eq!(decode(FieldType::Char(6), &bytes).unwrap(), Value::from("Bob"));

        // interior spaces and trailing spaces survive; only NUL is padding
        let bytes = encode(FieldType::Char(6), &Value::from("a b ")).unwrap();
        assert_eq!(decode(FieldType::Char(6), &bytes).unwrap(), Value::from("a b "));
    }

    #[test]
    fn test_char_truncates_long_values() {
        let bytes = encode(FieldType::Char(4), &Value::from("Babitskiy")).unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(decode(FieldType::Char(4), &bytes).unwrap(), Value::from("Babi"));
    }

    #[test]
    fn test_char_truncates_on_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it
        let bytes = encode(FieldType::Char(2), &Value::from("aé")).unwrap();
        assert_eq!(bytes, vec![b'a', 0]);
        assert_eq!(decode(FieldType::Char(2), &bytes).unwrap(), Value::from("a"));
    }

    #[test]
    fn test_char_decode_reads_only_its_width() {
        let bytes = b"abcdefgh";
        assert_eq!(decode(FieldType::Char(3), bytes).unwrap(), Value::from("abc"));
    }

    #[test]
    fn test_decode_short_input() {
        assert!(matches!(decode(FieldType::Int, &[1, 2]), Err(StorageError::Corruption(_))));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            decode(FieldType::Char(2), &[0xc3, 0x28]),
            Err(StorageError::Corruption(_))
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let schema = user();
        let result = encode_row(&schema, &[("id", Value::from("x")), ("age", Value::Integer(1))]);
        assert!(matches!(
            result,
            Err(StorageError::TypeMismatch { column, .. }) if column == "id"
        ));
    }

    #[test]
    fn test_encode_row_column_checks() {
        let schema = user();
        assert!(matches!(
            encode_row(&schema, &[("id", Value::Integer(1))]),
            Err(StorageError::InvalidArgument(_))
        ));
        assert!(matches!(
            encode_row(
                &schema,
                &[("id", Value::Integer(1)), ("age", Value::Integer(1)), ("x", Value::Integer(1))]
            ),
            Err(StorageError::UnknownColumn(c)) if c == "x"
        ));
    }

    #[test]
    fn test_mixed_schema_offsets() {
        let schema = TableSchema::new(
            "Person",
            vec![
                ColumnDef::new("id", FieldType::Int),
                ColumnDef::new("name", FieldType::Char(10)),
                ColumnDef::new("bd", FieldType::Date),
            ],
        )
        .unwrap();
        assert_eq!(row_byte_size(&schema), 18);
        assert_eq!(offset_of(&schema, "bd").unwrap(), 14);

        let row = encode_row(
            &schema,
            &[
                ("bd", Value::Integer(19990825)),
                ("id", Value::Integer(1)),
                ("name", Value::from("Bogdan")),
            ],
        )
        .unwrap();
        let record = decode_row(&schema, &row, &["bd", "name"]).unwrap();
        assert_eq!(record.get("bd"), Some(&Value::Integer(19990825)));
        assert_eq!(record.get("name"), Some(&Value::from("Bogdan")));
        assert_eq!(record.get("id"), None);
    }
}
