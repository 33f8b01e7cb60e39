//! Parsed route tokens.

use serde::{Deserialize, Serialize};

/// A single unit of a parsed route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// Text matched verbatim.
    Literal(String),
    /// Named placeholder with the regex fragment it must match.
    Variable { name: String, pattern: String },
}

impl Token {
    pub fn literal(text: impl Into<String>) -> Self {
        Token::Literal(text.into())
    }

    pub fn variable(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Token::Variable {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// One concrete route produced by the parser.
pub type TokenSequence = Vec<Token>;
