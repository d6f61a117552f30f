//! Literal parsers
//!
//! Pure functions from token text to literal leaves. Number parsing follows a strict rule:
//! text with a `.` is a double, anything else must fit a signed 32-bit integer. There is no
//! fallback from one to the other, so `1e5` and `2147483648` are errors, not doubles. Parsing
//! never depends on the process locale.

use super::error::BuildError;
use crate::es3::ast::{FloatLiteral, IntegerLiteral, Node, RegexLiteral, Span, StringLiteral};
use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal literal pattern is valid")
});

fn failure(what: &'static str, text: &str, span: Span) -> BuildError {
    BuildError::LiteralParseFailure {
        what,
        text: text.to_string(),
        span,
    }
}

/// `DecimalLiteral` text to an `Integer` or `Float` leaf.
pub fn parse_number(text: &str, span: Span) -> Result<Node, BuildError> {
    if !DECIMAL_LITERAL.is_match(text) {
        return Err(failure("number", text, span));
    }
    if text.contains('.') {
        let value = text
            .parse::<f64>()
            .map_err(|_| failure("number", text, span))?;
        Ok(Node::Float(FloatLiteral { value, span }))
    } else {
        let value = text
            .parse::<i32>()
            .map_err(|_| failure("number", text, span))?;
        Ok(Node::Integer(IntegerLiteral { value, span }))
    }
}

/// `HexIntegerLiteral` text (`0x1F`) to an `Integer` leaf, same 32-bit range as decimals.
pub fn parse_hex(text: &str, span: Span) -> Result<Node, BuildError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| failure("number", text, span))?;
    let value = i32::from_str_radix(digits, 16).map_err(|_| failure("number", text, span))?;
    Ok(Node::Integer(IntegerLiteral { value, span }))
}

/// Quoted `StringLiteral` text to a `String` leaf holding the contents and the quote used.
pub fn parse_string(text: &str, span: Span) -> Result<Node, BuildError> {
    let quote = match text.chars().next() {
        Some(quote @ ('"' | '\'')) => quote,
        _ => return Err(failure("string", text, span)),
    };
    if text.len() < 2 || !text.ends_with(quote) {
        return Err(failure("string", text, span));
    }
    Ok(Node::String(StringLiteral {
        value: text[1..text.len() - 1].to_string(),
        quote,
        span,
    }))
}

/// `/pattern/flags` text to a `Regex` leaf.
pub fn parse_regex(text: &str, span: Span) -> Result<Node, BuildError> {
    let body = text
        .strip_prefix('/')
        .ok_or_else(|| failure("regex", text, span))?;
    let close = body.rfind('/').ok_or_else(|| failure("regex", text, span))?;
    let (pattern, flags) = (&body[..close], &body[close + 1..]);
    if pattern.is_empty() {
        return Err(failure("regex", text, span));
    }
    Ok(Node::Regex(RegexLiteral {
        pattern: pattern.to_string(),
        flags: flags.to_string(),
        span,
    }))
}

/// Property names lose their surrounding quotes: `'a'`, `"a"` and `a` all name `a`.
pub fn property_name(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"')
}
