//! Source loading utilities
//!
//! This module provides `SourceLoader` - a utility for loading ES3 source text from files,
//! byte buffers or strings and running transforms on it. This is used by both production code
//! and tests.
//!
//! ```rust,ignore
//! use es3_ast::es3::loader::{Encoding, SourceLoader};
//!
//! // From file
//! let program = SourceLoader::from_path("script.js", Encoding::Utf8)?.build()?;
//!
//! // From string
//! let program = SourceLoader::from_string("var a = 1;").build()?;
//!
//! // Custom transform
//! let tokens = SourceLoader::from_string("a + b").with(&TOKENIZATION)?;
//! ```
//!
//! Byte input is decoded with an explicit [Encoding]; a leading byte order mark is dropped.

use crate::es3::ast::{Node, Position, SourceLocation};
use crate::es3::config::BuildConfig;
use crate::es3::lexing::TokenStream;
use crate::es3::parsing::ParseNode;
use crate::es3::transforms::standard::{
    string_to_ast_with, STRING_TO_AST, TOKENIZATION, TO_PARSE_TREE,
};
use crate::es3::transforms::{Transform, TransformError};
use std::fmt;
use std::fs;
use std::path::Path;

/// Text encodings accepted for byte input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Decode `bytes` into a string, dropping a leading byte order mark.
    pub fn decode(self, bytes: &[u8]) -> Result<String, LoaderError> {
        let text = match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|err| {
                LoaderError::Decode {
                    encoding: self,
                    message: err.to_string(),
                }
            })?,
            Encoding::Utf16Le | Encoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(LoaderError::Decode {
                        encoding: self,
                        message: format!("odd number of bytes ({})", bytes.len()),
                    });
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| match self {
                        Encoding::Utf16Le => u16::from_le_bytes([pair[0], pair[1]]),
                        _ => u16::from_be_bytes([pair[0], pair[1]]),
                    })
                    .collect();
                String::from_utf16(&units).map_err(|err| LoaderError::Decode {
                    encoding: self,
                    message: err.to_string(),
                })?
            }
            Encoding::Latin1 => bytes.iter().map(|&byte| char::from(byte)).collect(),
        };

        Ok(match text.strip_prefix('\u{FEFF}') {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error that can occur when loading sources
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderError {
    /// IO error when reading file
    Io(String),
    /// Bytes that are not valid in the requested encoding
    Decode { encoding: Encoding, message: String },
    /// Tokenization, parsing or building failed; `position` is where, when known
    Transform {
        error: TransformError,
        position: Option<Position>,
    },
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Io(msg) => write!(f, "IO error: {}", msg),
            LoaderError::Decode { encoding, message } => {
                write!(f, "Invalid {} input: {}", encoding, message)
            }
            // Positions are zero based internally, shown one based
            LoaderError::Transform {
                error,
                position: Some(position),
            } => write!(
                f,
                "{}:{}: {}",
                position.line + 1,
                position.column + 1,
                error
            ),
            LoaderError::Transform {
                error,
                position: None,
            } => write!(f, "Transform error: {}", error),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err.to_string())
    }
}

impl From<TransformError> for LoaderError {
    fn from(error: TransformError) -> Self {
        LoaderError::Transform {
            error,
            position: None,
        }
    }
}

/// Source loader with transform shortcuts
#[derive(Debug)]
pub struct SourceLoader {
    source: String,
}

impl SourceLoader {
    /// Load from a file path, decoding with `encoding`
    pub fn from_path<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<Self, LoaderError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, encoding)
    }

    /// Load from raw bytes, decoding with `encoding`
    pub fn from_bytes(bytes: &[u8], encoding: Encoding) -> Result<Self, LoaderError> {
        Ok(SourceLoader {
            source: encoding.decode(bytes)?,
        })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        SourceLoader {
            source: source.into(),
        }
    }

    /// Run a custom transform on the source.
    ///
    /// Stage failures that carry a byte offset are reported with their line:column position.
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        transform
            .run(self.source.clone())
            .map_err(|error| self.locate(error))
    }

    /// Build the top-level AST nodes. Shortcut for `.with(&STRING_TO_AST)`.
    pub fn build(&self) -> Result<Vec<Node>, LoaderError> {
        self.with(&STRING_TO_AST)
    }

    /// Build with custom limits
    pub fn build_with(&self, config: BuildConfig) -> Result<Vec<Node>, LoaderError> {
        self.with(&string_to_ast_with(config))
    }

    /// Parse into the parse tree only. Shortcut for `.with(&TO_PARSE_TREE)`.
    pub fn parse_tree(&self) -> Result<Option<ParseNode>, LoaderError> {
        self.with(&TO_PARSE_TREE)
    }

    /// Tokenize, trivia included. Shortcut for `.with(&TOKENIZATION)`.
    pub fn tokenize(&self) -> Result<TokenStream, LoaderError> {
        self.with(&TOKENIZATION)
    }

    /// Get a reference to the decoded source string
    pub fn source(&self) -> &str {
        &self.source
    }

    fn locate(&self, error: TransformError) -> LoaderError {
        let position = error
            .offset()
            .map(|offset| SourceLocation::new(&self.source).byte_to_position(offset));
        LoaderError::Transform { error, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es3::token::Token;

    #[test]
    fn test_from_string() {
        let loader = SourceLoader::from_string("var a;");
        assert_eq!(loader.source(), "var a;");
    }

    #[test]
    fn test_build() {
        let nodes = SourceLoader::from_string("a; b; c").build().unwrap();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_tokenize() {
        let tokens = SourceLoader::from_string("a\n").tokenize().unwrap();
        assert_eq!(tokens.last().map(|(t, _)| *t), Some(Token::LineTerminator));
    }

    #[test]
    fn test_parse_tree() {
        assert!(SourceLoader::from_string("").parse_tree().unwrap().is_none());
    }

    #[test]
    fn test_errors_report_line_and_column() {
        let err = SourceLoader::from_string("var a;\nvar 1;")
            .build()
            .unwrap_err();
        match &err {
            LoaderError::Transform { position, .. } => {
                assert_eq!(*position, Some(Position::new(1, 4)))
            }
            other => panic!("expected a transform error, got {:?}", other),
        }
        assert!(err.to_string().starts_with("2:5: Stage 'Parsing' failed"));
    }

    #[test]
    fn test_utf8_bom_dropped() {
        let loader = SourceLoader::from_bytes(b"\xEF\xBB\xBFa;", Encoding::Utf8).unwrap();
        assert_eq!(loader.source(), "a;");
    }

    #[test]
    fn test_utf16() {
        let le = [0xFF, 0xFE, b'a', 0, b';', 0];
        assert_eq!(
            SourceLoader::from_bytes(&le, Encoding::Utf16Le).unwrap().source(),
            "a;"
        );
        let be = [0, b'x', 0, b'=', 0, b'1'];
        assert_eq!(
            SourceLoader::from_bytes(&be, Encoding::Utf16Be).unwrap().source(),
            "x=1"
        );
        assert!(matches!(
            SourceLoader::from_bytes(&[0, b'x', 0], Encoding::Utf16Be),
            Err(LoaderError::Decode { encoding: Encoding::Utf16Be, .. })
        ));
    }

    #[test]
    fn test_latin1() {
        let loader = SourceLoader::from_bytes(b"s = '\xE9';", Encoding::Latin1).unwrap();
        assert_eq!(loader.source(), "s = 'é';");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = SourceLoader::from_bytes(b"\xFF\xFE", Encoding::Utf8).unwrap_err();
        assert!(err.to_string().starts_with("Invalid UTF-8 input"));
    }

    #[test]
    fn test_from_path_nonexistent() {
        let result = SourceLoader::from_path("/nonexistent/script.js", Encoding::Utf8);
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }
}
