//! Base tokenization implementation for the ES3 lexer
//!
//! This module provides the raw tokenization using the logos lexer library.
//! This is the entry point where source strings become token streams.

use super::common::{LexError, TokenStream};
use crate::es3::token::Token;
use logos::Logos;

/// Tokenize source code with location information
///
/// Returns every token, trivia included, paired with its byte range. Fails on the first
/// character that matches no token.
///
/// Note that a regular expression literal comes out of this function as a run of ordinary
/// tokens starting with `Slash`; only the parser knows when `/` opens a regex.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(LexError::UnexpectedCharacter {
                    text: lexer.slice().to_string(),
                    span: lexer.span(),
                })
            }
        }
    }

    Ok(tokens)
}

/// Tokenize and drop trivia (line terminators and comments)
pub fn tokenize_significant(source: &str) -> Result<TokenStream, LexError> {
    Ok(tokenize(source)?
        .into_iter()
        .filter(|(token, _)| !token.is_trivia())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizes() {
        let tokens = tokenize("var x = 1;").unwrap();
        assert_eq!(
            tokens,
            vec![
                (Token::Var, 0..3),
                (Token::Identifier, 4..5),
                (Token::Assign, 6..7),
                (Token::DecimalLiteral, 8..9),
                (Token::Semicolon, 9..10),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(tokenize("  \t ").unwrap(), vec![]);
    }

    #[test]
    fn test_ranges_slice_back_to_source() {
        let source = "foo.bar(\"baz\", 0x10)";
        for (token, range) in tokenize(source).unwrap() {
            let text = &source[range];
            match token {
                Token::Identifier => assert!(text == "foo" || text == "bar"),
                Token::StringLiteral => assert_eq!(text, "\"baz\""),
                Token::HexIntegerLiteral => assert_eq!(text, "0x10"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_significant_drops_trivia() {
        let tokens = tokenize_significant("a // c\n+ b").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();
        assert_eq!(kinds, vec![Token::Identifier, Token::Plus, Token::Identifier]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a # b").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                text: "#".to_string(),
                span: 2..3
            }
        );
        assert_eq!(err.to_string(), "Unexpected character '#' at byte 2");
    }
}
