//! Parsing module for ES3 source text
//!
//! This module turns source text into the grammar-shaped parse tree that the AST builder
//! consumes:
//! 1. **Lexing**: tokens are pulled lazily from the logos lexer (see [lexing](crate::es3::lexing))
//! 2. **Parsing**: a recursive-descent parser assembles [ParseNode] trees
//!
//! ## Terminology
//!
//! - **parse tree**: the untyped [ParseNode] tree, one node per grammar construct
//! - **build**: turning a parse tree into the typed AST, see [building](crate::es3::building)
//!
//! The tree is also the interchange format for hand-built input: anything that can produce
//! [ParseNode] values (with the kinds and shapes documented in [parser]) can be fed to the
//! builder directly.

pub mod common;
pub mod ir;
pub mod parser;

pub use common::ParseError;
pub use ir::{NodeKind, ParseNode, NODE_KIND_NAMES};
pub use parser::{Parser, DEFAULT_MAX_DEPTH};

use crate::es3::config::BuildConfig;
use crate::es3::nesting::with_nesting_stack;

/// Parse a source unit with the default nesting limit.
pub fn parse_source(source: &str) -> Result<Option<ParseNode>, ParseError> {
    parse_source_with(source, &BuildConfig::default())
}

/// Parse a source unit with the nesting limit from `config`.
///
/// The parser runs on a stack sized for `config.max_depth`, so input nested past the limit
/// fails with [ParseError::NestingTooDeep] rather than overflowing the caller's stack.
pub fn parse_source_with(
    source: &str,
    config: &BuildConfig,
) -> Result<Option<ParseNode>, ParseError> {
    let max_depth = config.max_depth;
    let tree = with_nesting_stack(max_depth, || {
        Parser::new(source)?
            .with_max_depth(max_depth)
            .parse_program()
    })?;
    log::debug!(
        target: "es3::parse",
        "parsed {} bytes into {}",
        source.len(),
        tree.as_ref().map_or("an empty unit", |root| root.kind.name())
    );
    Ok(tree)
}
