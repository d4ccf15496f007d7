/// flatql SQL subset
///
/// `SELECT <field[, field...]|*> FROM <table> [WHERE <field> <op> <value>];`
///
/// Pipeline:
/// - Splitter: cuts a script into statements on `;` or line feed
/// - Lexer: cuts a statement into words, keeping quoted literals whole
/// - Parser: builds the AST, delegating the WHERE words to `where_clause`
/// - Executor: runs the AST against the catalog and table storage

pub mod splitter;
pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod where_clause;
pub mod executor;

pub use splitter::{split_statements, DELIMITER};
pub use token::Token;
pub use lexer::{tokenize, Lexer};
pub use ast::{CommandKind, ComparisonOp, FieldList, SelectStmt, Statement, WhereClause};
pub use parser::Parser;
pub use where_clause::parse_where;
pub use executor::{QueryExecutor, SelectResult};

use crate::error::ParseError;

/// Parse one statement (a trailing `;` is optional)
pub fn parse_statement(statement: &str) -> Result<Statement, ParseError> {
    let tokens = tokenize(statement)?;
    Parser::new(tokens).parse()
}

/// Parse a whole script. Blank statements produced by the splitter are skipped.
pub fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    split_statements(source)
        .iter()
        .filter(|statement| !splitter::is_blank(statement))
        .map(|statement| parse_statement(statement))
        .collect()
}
