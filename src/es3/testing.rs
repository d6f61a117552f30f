//! Testing utilities for AST assertions
//!
//!     Unit tests inside the builder look at individual nodes. Everything above that (whole
//!     programs, desugaring, the `new` rewrite) is tested through [assert_program], which
//!     runs the full pipeline and offers fluent assertions on the result:
//!
//!     ```rust,ignore
//!     use es3_ast::es3::testing::assert_program;
//!
//!     assert_program("outer: while (a) { break outer; }")
//!         .statement_count(1)
//!         .statement(0)
//!         .kind("While")
//!         .label(Some("outer"))
//!         .sexp("(while@outer a (block (break outer)))");
//!     ```
//!
//!     Comparing S-expressions (see [crate::es3::formats::sexp]) is the preferred way to
//!     check tree shape: one line states the whole expected structure and spans stay out of
//!     the way. Reach for the per-node assertions when an attribute the rendering hides
//!     matters, like spans or the exact literal type.

pub mod ast_assertions;

pub use ast_assertions::{assert_program, NodeAssertion, ProgramAssertion};
