/// Statement tokenizer - cuts one statement into words

use super::splitter::DELIMITER;
use super::token::Token;
use crate::error::ParseError;

/// Splits a statement on whitespace and commas, keeping quoted regions whole.
///
/// The delimiter ends the current word and is emitted as its own token.
/// Numbers and identifiers are not told apart here; that depends on where
/// the word sits in the statement.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut word = String::new();
        let mut quote: Option<char> = None;
        let mut quoted = false;

        while let Some(ch) = self.current_char() {
            self.advance();

            if let Some(open) = quote {
                if ch == open {
                    quote = None;
                } else {
                    word.push(ch);
                }
                continue;
            }

            match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    quoted = true;
                }
                ',' => Self::flush(&mut tokens, &mut word, &mut quoted),
                DELIMITER => {
                    Self::flush(&mut tokens, &mut word, &mut quoted);
                    tokens.push(Token::new(DELIMITER.to_string()));
                }
                c if c.is_whitespace() => Self::flush(&mut tokens, &mut word, &mut quoted),
                c => word.push(c),
            }
        }

        if quote.is_some() {
            return Err(ParseError::UnterminatedQuote);
        }
        Self::flush(&mut tokens, &mut word, &mut quoted);

        Ok(tokens)
    }

    /// Emit the pending word, if any. An empty quoted literal (`''`) is a word.
    fn flush(tokens: &mut Vec<Token>, word: &mut String, quoted: &mut bool) {
        if !word.is_empty() || *quoted {
            tokens.push(Token {
                text: std::mem::take(word),
                quoted: *quoted,
            });
        }
        *quoted = false;
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        if self.position < self.input.len() {
            self.position += 1;
        }
    }
}

/// Tokenize one statement
pub fn tokenize(statement: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(statement).tokenize()
}
