/// Table schema definitions and fixed-width layout
use crate::error::{ParseError, Result, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column data type. Width on disk is a pure function of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// 4 bytes, signed, little-endian
    Int,
    /// Same encoding as `Int`
    Date,
    /// Fixed `n` bytes of UTF-8, NUL padded
    Char(u32),
}

impl FieldType {
    /// Bytes one value of this type occupies in a row
    pub fn width(&self) -> u32 {
        match self {
            FieldType::Int | FieldType::Date => 4,
            FieldType::Char(n) => *n,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Date)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => write!(f, "Int"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Char(n) => write!(f, "Char({})", n),
        }
    }
}

impl FromStr for FieldType {
    type Err = ParseError;

    /// Accepts `Int`, `Date`, `Char` and `Char(n)`. A bare `Char` is one byte wide.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s.trim();
        let (name, size) = match raw.find('(') {
            Some(open) => {
                let close = raw
                    .rfind(')')
                    .filter(|close| *close > open && *close == raw.len() - 1)
                    .ok_or_else(|| ParseError::InvalidType(raw.to_string()))?;
                (&raw[..open], Some(raw[open + 1..close].trim()))
            }
            None => (raw, None),
        };

        match (name.trim().to_ascii_lowercase().as_str(), size) {
            ("int", None) => Ok(FieldType::Int),
            ("date", None) => Ok(FieldType::Date),
            ("char", None) => Ok(FieldType::Char(1)),
            ("char", Some(n)) => match n.parse::<u32>() {
                Ok(n) if n > 0 => Ok(FieldType::Char(n)),
                _ => Err(ParseError::InvalidType(raw.to_string())),
            },
            _ => Err(ParseError::InvalidType(raw.to_string())),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = ParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.to_string()
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Column data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Table schema: ordered columns of one fixed-width table
///
/// Immutable once built. `row_byte_size` and per-column offsets are computed
/// up front so the codec never re-derives them per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column definitions (ordered)
    columns: Vec<ColumnDef>,
    /// Byte offset of each column, parallel to `columns`
    #[serde(skip)]
    offsets: Vec<u32>,
    #[serde(skip)]
    row_byte_size: u32,
}

impl TableSchema {
    /// Create a new table schema, rejecting empty or duplicate column lists
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Self> {
        let name = name.into();

        if columns.is_empty() {
            return Err(StorageError::InvalidArgument(format!(
                "Table '{}' has no columns",
                name
            )));
        }

        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(StorageError::InvalidArgument(format!(
                    "Duplicate column '{}' in table '{}'",
                    col.name, name
                )));
            }
        }

        let total = columns
            .iter()
            .try_fold(0u32, |size, col| size.checked_add(col.field_type.width()));
        if total.is_none() {
            return Err(StorageError::InvalidArgument(format!(
                "Row of table '{}' is too wide",
                name
            )));
        }

        Ok(Self::layout(name, columns))
    }

    /// Lay out columns already known to be non-empty, unique and narrow enough
    pub(crate) fn layout(name: String, columns: Vec<ColumnDef>) -> Self {
        let mut offsets = Vec::with_capacity(columns.len());
        let mut row_byte_size = 0u32;
        for col in &columns {
            offsets.push(row_byte_size);
            row_byte_size = row_byte_size.saturating_add(col.field_type.width());
        }

        Self {
            name,
            columns,
            offsets,
            row_byte_size,
        }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Sum of all column widths
    pub fn row_byte_size(&self) -> u32 {
        self.row_byte_size
    }

    /// Get column definition and its byte offset by name
    pub fn get_column(&self, name: &str) -> Option<(&ColumnDef, u32)> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(|i| (&self.columns[i], self.offsets[i]))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Byte offset of a column inside a row
    pub fn offset_of(&self, name: &str) -> Result<u32> {
        self.get_column(name)
            .map(|(_, offset)| offset)
            .ok_or_else(|| StorageError::UnknownColumn(name.to_string()))
    }
}

#[derive(Deserialize)]
struct RawTableSchema {
    name: String,
    columns: Vec<ColumnDef>,
}

impl<'de> Deserialize<'de> for TableSchema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawTableSchema::deserialize(deserializer)?;
        TableSchema::new(raw.name, raw.columns).map_err(serde::de::Error::custom)
    }
}
