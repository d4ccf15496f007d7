/// WHERE clause parser - one `field op value` comparison
use super::ast::{ComparisonOp, WhereClause};
use super::token::Token;
use crate::error::ParseError;
use crate::types::Value;

/// Boolean combinators that are recognised but never evaluated
const RESERVED_OPERATORS: [&str; 2] = ["AND", "OR"];

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Word(String),
    Number(String),
    Symbol(String),
    Quoted(String),
}

impl Lexeme {
    fn text(&self) -> &str {
        match self {
            Lexeme::Word(s) | Lexeme::Number(s) | Lexeme::Symbol(s) | Lexeme::Quoted(s) => s,
        }
    }

    fn reserved_operator(&self) -> Option<String> {
        match self {
            Lexeme::Word(w) => {
                let upper = w.to_ascii_uppercase();
                RESERVED_OPERATORS.contains(&upper.as_str()).then_some(upper)
            }
            _ => None,
        }
    }
}

/// Parse the tokens that follow `WHERE` into a single comparison.
///
/// Tokens need not be space separated: `id>=1` and `id = 1` both split into
/// field, operator and value. Quoted tokens are always text values; an
/// unquoted value must be an integer.
pub fn parse_where(tokens: &[Token]) -> Result<WhereClause, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyWhere);
    }

    let lexemes = split_lexemes(tokens);
    let mut iter = lexemes.into_iter();

    let field = match iter.next() {
        Some(Lexeme::Word(w)) => w,
        _ => return Err(ParseError::MissingField),
    };

    let operator = match iter.next() {
        Some(Lexeme::Symbol(s)) => {
            let normalized = s.to_ascii_uppercase();
            ComparisonOp::from_symbol(&normalized)
                .ok_or(ParseError::InvalidOperator(normalized))?
        }
        Some(word @ Lexeme::Word(_)) => {
            return Err(match word.reserved_operator() {
                Some(reserved) => ParseError::ReservedOperator(reserved),
                None => ParseError::InvalidOperator(word.text().to_string()),
            })
        }
        _ => return Err(ParseError::MissingOperator),
    };

    let value = match iter.next() {
        Some(Lexeme::Quoted(text)) => Value::Text(text),
        Some(Lexeme::Number(n)) => n
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| ParseError::InvalidValue(n))?,
        Some(other) => return Err(ParseError::InvalidValue(other.text().to_string())),
        None => return Err(ParseError::MissingValue),
    };

    if let Some(extra) = iter.next() {
        return Err(match extra.reserved_operator() {
            Some(reserved) => ParseError::ReservedOperator(reserved),
            None => ParseError::UnexpectedToken(extra.text().to_string()),
        });
    }

    Ok(WhereClause {
        field,
        operator,
        value,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Break unquoted tokens into words, numbers and operator symbols
fn split_lexemes(tokens: &[Token]) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();

    for token in tokens {
        if token.quoted {
            lexemes.push(Lexeme::Quoted(token.text.clone()));
            continue;
        }

        let chars: Vec<char> = token.text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let starts_negative =
                chars[i] == '-' && chars.get(i + 1).map_or(false, |c| c.is_ascii_digit());

            if is_word_char(chars[i]) || starts_negative {
                let start = i;
                i += 1;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                if starts_negative || chars[start].is_ascii_digit() {
                    lexemes.push(Lexeme::Number(text));
                } else {
                    lexemes.push(Lexeme::Word(text));
                }
            } else {
                let start = i;
                i += 1;
                while i < chars.len()
                    && !is_word_char(chars[i])
                    && !(chars[i] == '-'
                        && chars.get(i + 1).map_or(false, |c| c.is_ascii_digit()))
                {
                    i += 1;
                }
                lexemes.push(Lexeme::Symbol(chars[start..i].iter().collect()));
            }
        }
    }

    lexemes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::lexer::tokenize;

    fn parse_text(text: &str) -> Result<WhereClause, ParseError> {
        parse_where(&tokenize(text).unwrap())
    }

    #[test]
    fn test_integer_equality() {
        let clause = parse_text("id = 1").unwrap();
        assert_eq!(clause, WhereClause::new("id", ComparisonOp::Eq, Value::Integer(1)));
    }

    #[test]
    fn test_without_spaces() {
        assert_eq!(
            parse_text("age>20").unwrap(),
            WhereClause::new("age", ComparisonOp::Gt, Value::Integer(20))
        );
        assert_eq!(
            parse_text("age!=-3").unwrap(),
            WhereClause::new("age", ComparisonOp::Ne, Value::Integer(-3))
        );
    }

    #[test]
    fn test_all_operators() {
        for (text, op) in [
            ("a = 1", ComparisonOp::Eq),
            ("a != 1", ComparisonOp::Ne),
            ("a < 1", ComparisonOp::Lt),
            ("a > 1", ComparisonOp::Gt),
        ] {
            assert_eq!(parse_text(text).unwrap().operator, op);
        }
    }

    #[test]
    fn test_quoted_text_value() {
        let clause = parse_text("name = 'Bogdan Babitskiy'").unwrap();
        assert_eq!(clause.value, Value::Text("Bogdan Babitskiy".into()));

        // digits inside quotes stay text
        let clause = parse_text("code = \"007\"").unwrap();
        assert_eq!(clause.value, Value::Text("007".into()));
    }

    #[test]
    fn test_invalid_operator() {
        assert_eq!(parse_text("id % 1"), Err(ParseError::InvalidOperator("%".into())));
        assert_eq!(parse_text("id <= 1"), Err(ParseError::InvalidOperator("<=".into())));
        assert_eq!(
            parse_text("id like 1"),
            Err(ParseError::InvalidOperator("like".into()))
        );
    }

    #[test]
    fn test_reserved_combinators() {
        assert_eq!(parse_text("id and 1"), Err(ParseError::ReservedOperator("AND".into())));
        assert_eq!(
            parse_text("id = 1 or age > 3"),
            Err(ParseError::ReservedOperator("OR".into()))
        );
    }

    #[test]
    fn test_bare_word_value_rejected() {
        assert_eq!(parse_text("id > x"), Err(ParseError::InvalidValue("x".into())));
        assert_eq!(parse_text("id > 12a"), Err(ParseError::InvalidValue("12a".into())));
    }

    #[test]
    fn test_missing_parts() {
        assert_eq!(parse_where(&[]), Err(ParseError::EmptyWhere));
        assert_eq!(parse_text("= 1"), Err(ParseError::MissingField));
        assert_eq!(parse_text("id"), Err(ParseError::MissingOperator));
        assert_eq!(parse_text("id ="), Err(ParseError::MissingValue));
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            parse_text("id = 1 2"),
            Err(ParseError::UnexpectedToken("2".into()))
        );
    }
}
