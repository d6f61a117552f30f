//! Standard transform definitions
//!
//! Pre-built transforms for the common processing paths, defined as statics with
//! `once_cell::sync::Lazy`. They use the default [BuildConfig]; build a custom pipeline with
//! [string_to_ast_with] to change limits.

use crate::es3::ast::Node;
use crate::es3::config::BuildConfig;
use crate::es3::lexing::TokenStream;
use crate::es3::parsing::ParseNode;
use crate::es3::transforms::stages::{Building, Parsing, Tokenization};
use crate::es3::transforms::Transform;
use once_cell::sync::Lazy;

/// Type alias for tokenization transform
pub type TokenizationTransform = Transform<String, TokenStream>;

/// Type alias for parse tree transform
pub type ParseTreeTransform = Transform<String, Option<ParseNode>>;

/// Type alias for AST transform
pub type AstTransform = Transform<String, Vec<Node>>;

/// Tokenization transform: String → Vec<(Token, Range<usize>)>
pub static TOKENIZATION: Lazy<TokenizationTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Tokenization::new()));

/// String to parse tree transform: String → Option<ParseNode>
pub static TO_PARSE_TREE: Lazy<ParseTreeTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Parsing::new()));

/// String to AST transform: String → Vec<Node>
///
/// 1. Parsing to the parse tree (tokens are pulled by the parser)
/// 2. Building the top-level AST nodes
pub static STRING_TO_AST: Lazy<AstTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&TO_PARSE_TREE).then(Building::new()));

/// String to AST transform with custom limits
pub fn string_to_ast_with(config: BuildConfig) -> AstTransform {
    Transform::from_fn(Ok)
        .then(Parsing::with_config(config.clone()))
        .then(Building::with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es3::token::Token;

    #[test]
    fn test_tokenization() {
        let result = TOKENIZATION.run("a // c\nb".to_string()).unwrap();
        assert!(result.iter().any(|(t, _)| *t == Token::LineComment));
        assert!(result.iter().any(|(t, _)| *t == Token::LineTerminator));
    }

    #[test]
    fn test_to_parse_tree() {
        let tree = TO_PARSE_TREE.run("a; b;".to_string()).unwrap().unwrap();
        assert_eq!(tree.child_count(), 2);
    }

    #[test]
    fn test_string_to_ast() {
        let nodes = STRING_TO_AST.run("var a = 1; a++".to_string()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind_name(), "Assign");
        assert_eq!(nodes[1].kind_name(), "Postfix");
    }

    #[test]
    fn test_custom_limits() {
        let transform = string_to_ast_with(BuildConfig::with_max_depth(3));
        assert!(transform.run("a;".to_string()).is_ok());
        assert!(transform.run("[[[[a]]]];".to_string()).is_err());
    }

    #[test]
    fn test_transforms_are_reusable() {
        let first = STRING_TO_AST.run("a".to_string()).unwrap();
        let second = STRING_TO_AST.run("b".to_string()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_transforms_are_shareable() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        assert_send_sync(&*STRING_TO_AST);
    }
}
