//! Error types for the flatql query core

use crate::sql::ast::CommandKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Malformed statement shape. Always surfaced before anything is executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty statement")]
    EmptyStatement,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Expected at least one field before FROM")]
    MissingFields,

    #[error("Wildcard '*' cannot be combined with named fields")]
    MixedWildcard,

    #[error("Expected FROM")]
    MissingFrom,

    #[error("Expected a table name after FROM")]
    MissingTable,

    #[error("Expected exactly one table name, found: {0:?}")]
    ExtraTableTokens(Vec<String>),

    #[error("Expected a condition after WHERE")]
    EmptyWhere,

    #[error("Expected a field name in WHERE condition")]
    MissingField,

    #[error("Expected a comparison operator in WHERE condition")]
    MissingOperator,

    #[error("Incorrect logical operator {0}")]
    InvalidOperator(String),

    #[error("Operator {0} is reserved but not supported")]
    ReservedOperator(String),

    #[error("Expected a value in WHERE condition")]
    MissingValue,

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Unterminated quoted literal")]
    UnterminatedQuote,

    #[error("Invalid column type: {0}")]
    InvalidType(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Table not found: {0}")]
    UnknownTable(String),

    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Command not implemented: {0}")]
    UnsupportedCommand(CommandKind),

    #[error("Type mismatch on column '{column}': expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    #[error("Value {value} out of range for {field_type}")]
    ValueOutOfRange { value: i64, field_type: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("Data corruption: {0}")]
    Corruption(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl StorageError {
    /// True for errors raised while validating input, before any storage access
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StorageError::Parse(_)
                | StorageError::UnknownTable(_)
                | StorageError::UnknownColumn(_)
                | StorageError::TypeMismatch { .. }
                | StorageError::UnsupportedCommand(_)
        )
    }
}
