//! Output formats for the AST
//!
//! - [sexp]: a compact S-expression rendering, one line per program. Spans are left out, so two
//!   programs that differ only in layout render the same. Tests compare against it.
//! - [json]: the full tree, spans included, through `serde_json`.

pub mod json;
pub mod sexp;

pub use json::{to_json, to_json_program};
pub use sexp::{to_sexp, to_sexp_program};
