//! Lexer
//!
//!     This module provides tokenization of ES3 source text. Tokenization is done through the
//!     logos lexer library, see [token](crate::es3::token) for the token set.
//!
//!     Two ways of consuming tokens exist:
//!         1. [tokenize] produces the eager, flat token stream with byte ranges. Tooling and the
//!            tokenization stage of the transform pipeline use it.
//!         2. The parser drives a logos lexer lazily, one token of lookahead at a time. This is
//!            required because a `/` in operand position starts a regular expression literal,
//!            which the eager stream cannot know about.
//!
//! Source Token Preservation
//!
//!     Logos tokens carry the byte range of their source text. That range is carried through
//!     the parse tree onto every AST node, and is the only location information the builder
//!     keeps. Line:column positions are computed on demand with
//!     [SourceLocation](crate::es3::ast::SourceLocation).

pub mod base_tokenization;
pub mod common;

pub use base_tokenization::{tokenize, tokenize_significant};
pub use common::{LexError, TokenStream};
pub use crate::es3::token::Token;
