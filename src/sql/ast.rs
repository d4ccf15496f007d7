/// Abstract Syntax Tree for the supported statements
use crate::types::Value;
use std::fmt;

/// Top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStmt),
    /// Recognised command with no implementation behind it
    Unsupported(CommandKind),
}

/// Commands that parse but are not executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Insert,
    Delete,
    Create,
    Alter,
    Drop,
}

impl CommandKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "insert" => Some(CommandKind::Insert),
            "delete" => Some(CommandKind::Delete),
            "create" => Some(CommandKind::Create),
            "alter" => Some(CommandKind::Alter),
            "drop" => Some(CommandKind::Drop),
            _ => None,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Insert => "INSERT",
            CommandKind::Delete => "DELETE",
            CommandKind::Create => "CREATE",
            CommandKind::Alter => "ALTER",
            CommandKind::Drop => "DROP",
        };
        f.write_str(name)
    }
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub fields: FieldList,
    pub table: String,
    pub predicate: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldList {
    /// `*`: every column in schema order
    Wildcard,
    /// Named columns in request order, without duplicates
    Columns(Vec<String>),
}

/// Single `field op value` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub field: String,
    pub operator: ComparisonOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq, // =
    Ne, // !=
    Lt, // <
    Gt, // >
}

impl ComparisonOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(ComparisonOp::Eq),
            "!=" => Some(ComparisonOp::Ne),
            "<" => Some(ComparisonOp::Lt),
            ">" => Some(ComparisonOp::Gt),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
        }
    }

    /// Apply the operator to an already computed ordering of `left` vs `right`
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Gt => ordering == Ordering::Greater,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl WhereClause {
    pub fn new(field: impl Into<String>, operator: ComparisonOp, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Compare a row's value against the clause. Values of different kinds never match.
    pub fn matches(&self, row_value: &Value) -> bool {
        row_value
            .partial_cmp(&self.value)
            .map(|ordering| self.operator.holds(ordering))
            .unwrap_or(false)
    }
}
