//! Building stage - produces the AST

use crate::es3::ast::Node;
use crate::es3::building::build_ast;
use crate::es3::config::BuildConfig;
use crate::es3::parsing::ParseNode;
use crate::es3::transforms::{Runnable, TransformError};

/// Building stage: parse tree to the top-level AST nodes of the unit.
pub struct Building {
    config: BuildConfig,
}

impl Building {
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    pub fn with_config(config: BuildConfig) -> Self {
        Self { config }
    }
}

impl Default for Building {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Option<ParseNode>, Vec<Node>> for Building {
    fn run(&self, input: Option<ParseNode>) -> Result<Vec<Node>, TransformError> {
        build_ast(input, &self.config).map_err(|err| {
            TransformError::stage_failed("Building", &err, Some(err.span().start))
        })
    }
}
