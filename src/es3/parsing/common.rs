//! Common parser types
//!
//! Error type shared by the parser entry points.

use crate::es3::lexing::LexError;
use std::fmt;
use std::ops::Range;

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The tokenizer rejected the input
    Lex(LexError),
    /// A token (or the end of input) that the grammar does not allow here
    Unexpected {
        expected: String,
        found: String,
        span: Range<usize>,
    },
    /// A `/` in operand position with no closing `/` on the same line
    UnterminatedRegex { span: Range<usize> },
    /// Statement or expression nesting beyond the configured limit
    NestingTooDeep { limit: usize, span: Range<usize> },
}

impl ParseError {
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::Unexpected { span, .. }
            | ParseError::UnterminatedRegex { span }
            | ParseError::NestingTooDeep { span, .. } => span.clone(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{}", err),
            ParseError::Unexpected {
                expected,
                found,
                span,
            } => write!(
                f,
                "Expected {}, found {} at byte {}",
                expected, found, span.start
            ),
            ParseError::UnterminatedRegex { span } => {
                write!(f, "Unterminated regular expression at byte {}", span.start)
            }
            ParseError::NestingTooDeep { limit, span } => write!(
                f,
                "Nesting deeper than {} levels at byte {}",
                limit, span.start
            ),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}
