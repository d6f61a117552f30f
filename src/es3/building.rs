//! AST building
//!
//!     This module turns parse trees into the typed AST. During this step, important things
//!     happen:
//!
//!         1. Grouping nodes (`EXPR`, `PAREXPR`) disappear.
//!         2. Literal token text is parsed into values, see [literals].
//!         3. Compound operators are desugared into assignments over primitive operations.
//!         4. `new` expressions are re-associated with their member chains and arguments,
//!            see [new_rewrite].
//!         5. Labels and definition flags are attached to the nodes that carry them.
//!
//!     The entry point is [AstBuilder]; [build_ast] wraps the common case of building a
//!     whole source unit with a given configuration.

pub mod builder;
pub mod error;
pub mod literals;
pub mod new_rewrite;

pub use builder::AstBuilder;
pub use error::BuildError;

use crate::es3::ast::Node;
use crate::es3::config::BuildConfig;
use crate::es3::parsing::ParseNode;

/// Build the top-level nodes of a parsed source unit.
pub fn build_ast(root: Option<ParseNode>, config: &BuildConfig) -> Result<Vec<Node>, BuildError> {
    AstBuilder::with_config(config).build_program(root)
}
