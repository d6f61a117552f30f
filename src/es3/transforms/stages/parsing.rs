//! Parsing stage - produces the parse tree

use crate::es3::config::BuildConfig;
use crate::es3::parsing::{parse_source_with, ParseNode};
use crate::es3::transforms::{Runnable, TransformError};

/// Parsing stage: source text to the parse tree of the whole unit (`None` when the unit has
/// no statements).
pub struct Parsing {
    config: BuildConfig,
}

impl Parsing {
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    pub fn with_config(config: BuildConfig) -> Self {
        Self { config }
    }
}

impl Default for Parsing {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, Option<ParseNode>> for Parsing {
    fn run(&self, input: String) -> Result<Option<ParseNode>, TransformError> {
        parse_source_with(&input, &self.config).map_err(|err| {
            TransformError::stage_failed("Parsing", &err, Some(err.span().start))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es3::parsing::NodeKind;

    #[test]
    fn test_parsing_simple() {
        let node = Parsing::new().run("a;".to_string()).unwrap().unwrap();
        assert_eq!(node.kind, NodeKind::Expr);
    }

    #[test]
    fn test_parsing_empty_unit() {
        assert_eq!(Parsing::new().run("// only a comment".to_string()).unwrap(), None);
    }

    #[test]
    fn test_parsing_failure() {
        let err = Parsing::new().run("if (".to_string()).unwrap_err();
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_parsing_respects_depth_limit() {
        let stage = Parsing::with_config(BuildConfig::with_max_depth(4));
        let err = stage.run("((((((a))))))".to_string()).unwrap_err();
        assert!(err.to_string().contains("Nesting deeper than 4 levels"));
    }
}
