//! Common lexer module
//!
//! Shared types for the tokenization entry points.

use crate::es3::token::Token;
use std::fmt;
use std::ops::Range;

/// Flat sequence of tokens paired with their byte ranges
pub type TokenStream = Vec<(Token, Range<usize>)>;

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// Source text that matches no token
    UnexpectedCharacter { text: String, span: Range<usize> },
}

impl LexError {
    pub fn span(&self) -> Range<usize> {
        match self {
            LexError::UnexpectedCharacter { span, .. } => span.clone(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter { text, span } => {
                write!(f, "Unexpected character '{}' at byte {}", text, span.start)
            }
        }
    }
}

impl std::error::Error for LexError {}

impl From<LexError> for String {
    fn from(err: LexError) -> Self {
        err.to_string()
    }
}
