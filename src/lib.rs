//! # es3-ast
//!
//! AST construction for ECMAScript 3 sources: a logos tokenizer, a recursive-descent parser
//! producing a generic parse tree, and a builder that turns that tree into a typed AST.
//!
//! ```rust,ignore
//! use es3_ast::es3::loader::SourceLoader;
//!
//! let program = SourceLoader::from_string("var a = new Foo.Bar(1);").build()?;
//! ```
//!
//! ## Testing
//!
//! For testing guidelines and the fluent assertion API, see the
//! [testing module](es3::testing).

pub mod es3;
