//! Value and schema types shared by the parser, codec and executor

mod table;
mod row;

pub use table::{ColumnDef, FieldType, TableSchema};
pub use row::RowRecord;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed value, either decoded from a row or written in a WHERE clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Integer value (`Int` and `Date` columns)
    Integer(i64),

    /// Text string (`Char(n)` columns and quoted literals)
    Text(String),
}

impl Value {
    /// Name of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Text(_) => "Text",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_within_kind() {
        assert!(Value::Integer(1) < Value::Integer(2));
        assert!(Value::from("abc") < Value::from("abd"));
        assert!(Value::from("B") < Value::from("a"));
    }

    #[test]
    fn test_no_ordering_across_kinds() {
        assert_eq!(Value::Integer(1).partial_cmp(&Value::from("1")), None);
        assert_ne!(Value::Integer(1), Value::from("1"));
    }
}
