//! Errors raised while building the AST
//!
//! All of them are fatal: the builder stops at the first one and no partial tree is returned.

use crate::es3::ast::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A parse-tree node kind with no AST mapping in this position
    UnsupportedConstruct { kind: &'static str, span: Span },
    /// A label on a node whose kind cannot carry one
    InvalidLabelTarget {
        label: String,
        kind: &'static str,
        span: Span,
    },
    /// Literal token text that does not parse (`what` is "number", "string" or "regex")
    LiteralParseFailure {
        what: &'static str,
        text: String,
        span: Span,
    },
    /// A parse-tree node missing a child its kind requires
    MalformedNode {
        kind: &'static str,
        expected: &'static str,
        span: Span,
    },
    /// Tree nesting beyond the configured limit
    NestingTooDeep { limit: usize, span: Span },
}

impl BuildError {
    pub fn span(&self) -> Span {
        match self {
            BuildError::UnsupportedConstruct { span, .. }
            | BuildError::InvalidLabelTarget { span, .. }
            | BuildError::LiteralParseFailure { span, .. }
            | BuildError::MalformedNode { span, .. }
            | BuildError::NestingTooDeep { span, .. } => *span,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnsupportedConstruct { kind, .. } => {
                write!(f, "Unsupported construct: {}", kind)
            }
            BuildError::InvalidLabelTarget { label, kind, .. } => {
                write!(f, "Label '{}' cannot be attached to {}", label, kind)
            }
            BuildError::LiteralParseFailure { what, text, .. } => {
                write!(f, "Invalid {} literal: {}", what, text)
            }
            BuildError::MalformedNode { kind, expected, .. } => {
                write!(f, "Malformed {} node: missing {}", kind, expected)
            }
            BuildError::NestingTooDeep { limit, .. } => {
                write!(f, "Nesting deeper than {} levels", limit)
            }
        }
    }
}

impl std::error::Error for BuildError {}
