/// Raw statement tokens
use super::splitter::DELIMITER;
use std::fmt;

/// A word of a statement. Carries no type beyond its text and whether it was quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Set when the token came from a `'...'` or `"..."` region (quotes stripped)
    pub quoted: bool,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    /// Case-insensitive keyword match. Quoted tokens are never keywords.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        !self.quoted && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_delimiter(&self) -> bool {
        !self.quoted && self.text.len() == 1 && self.text.starts_with(DELIMITER)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "'{}'", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}
