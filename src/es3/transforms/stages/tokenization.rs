//! Tokenization stage
//!
//! Converts source text into the flat token stream, trivia included.

use crate::es3::lexing::{base_tokenization, TokenStream};
use crate::es3::transforms::{Runnable, TransformError};

/// Tokenization stage
///
/// # Input
/// - `String` - source code text
///
/// # Output
/// - `Vec<(Token, Range<usize>)>` - flat token stream with byte ranges
pub struct Tokenization;

impl Tokenization {
    pub fn new() -> Self {
        Tokenization
    }
}

impl Default for Tokenization {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, TokenStream> for Tokenization {
    fn run(&self, input: String) -> Result<TokenStream, TransformError> {
        Runnable::<&str, TokenStream>::run(self, input.as_str())
    }
}

impl Runnable<&str, TokenStream> for Tokenization {
    fn run(&self, input: &str) -> Result<TokenStream, TransformError> {
        base_tokenization::tokenize(input).map_err(|err| {
            TransformError::stage_failed("Tokenization", &err, Some(err.span().start))
        })
    }
}
