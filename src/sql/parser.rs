/// Command parser - converts one statement's tokens into an AST
use super::ast::*;
use super::token::Token;
use super::where_clause::parse_where;
use crate::error::ParseError;

const WILDCARD: &str = "*";

pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    /// Takes the tokens of a single statement. One trailing delimiter is dropped.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(false, Token::is_delimiter) {
            tokens.pop();
        }
        Self { tokens }
    }

    /// Parse the statement, dispatching on its first word
    pub fn parse(&self) -> Result<Statement, ParseError> {
        let (command, args) = self
            .tokens
            .split_first()
            .ok_or(ParseError::EmptyStatement)?;

        if command.is_keyword("select") {
            return Ok(Statement::Select(Self::parse_select(args)?));
        }

        match CommandKind::from_keyword(&command.text) {
            Some(kind) if !command.quoted => Ok(Statement::Unsupported(kind)),
            _ => Err(ParseError::UnknownCommand(command.text.clone())),
        }
    }

    /// SELECT <fields> FROM <table> [WHERE <condition>]
    fn parse_select(args: &[Token]) -> Result<SelectStmt, ParseError> {
        let from = args
            .iter()
            .position(|t| t.is_keyword("from"))
            .ok_or(ParseError::MissingFrom)?;
        let (field_tokens, rest) = (&args[..from], &args[from + 1..]);

        let (table_tokens, where_tokens) = match rest.iter().position(|t| t.is_keyword("where")) {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };

        let fields = Self::parse_fields(field_tokens)?;

        let table = match table_tokens {
            [] => return Err(ParseError::MissingTable),
            [table] => table.text.clone(),
            many => {
                return Err(ParseError::ExtraTableTokens(
                    many.iter().map(|t| t.text.clone()).collect(),
                ))
            }
        };

        let predicate = where_tokens.map(parse_where).transpose()?;

        Ok(SelectStmt {
            fields,
            table,
            predicate,
        })
    }

    fn parse_fields(tokens: &[Token]) -> Result<FieldList, ParseError> {
        if tokens.is_empty() {
            return Err(ParseError::MissingFields);
        }

        let is_wildcard = |t: &Token| !t.quoted && t.text == WILDCARD;
        if tokens.iter().any(is_wildcard) {
            return if tokens.len() == 1 {
                Ok(FieldList::Wildcard)
            } else {
                Err(ParseError::MixedWildcard)
            };
        }

        let mut columns: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if !columns.contains(&token.text) {
                columns.push(token.text.clone());
            }
        }
        Ok(FieldList::Columns(columns))
    }
}
