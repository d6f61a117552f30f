//! Fluent assertion API for built programs

use crate::es3::ast::Node;
use crate::es3::formats::sexp::{to_sexp, to_sexp_program};
use crate::es3::loader::SourceLoader;

// ============================================================================
// Entry Point
// ============================================================================

/// Build `source` and return assertions over its top-level nodes.
///
/// Panics with the loader's message if the source does not build.
pub fn assert_program(source: &str) -> ProgramAssertion {
    match SourceLoader::from_string(source).build() {
        Ok(nodes) => ProgramAssertion {
            nodes,
            source: source.to_string(),
        },
        Err(err) => panic!("Failed to build {:?}: {}", source, err),
    }
}

// ============================================================================
// Program Assertions
// ============================================================================

pub struct ProgramAssertion {
    nodes: Vec<Node>,
    source: String,
}

impl ProgramAssertion {
    pub fn statement_count(self, expected: usize) -> Self {
        assert_eq!(
            self.nodes.len(),
            expected,
            "{:?}: Expected {} top-level nodes, found {}",
            self.source,
            expected,
            self.nodes.len()
        );
        self
    }

    /// Compare the whole program's S-expression rendering
    pub fn sexp(self, expected: &str) -> Self {
        assert_eq!(
            to_sexp_program(&self.nodes),
            expected,
            "{:?}: program shape",
            self.source
        );
        self
    }

    pub fn statement(&self, index: usize) -> NodeAssertion<'_> {
        match self.nodes.get(index) {
            Some(node) => NodeAssertion {
                node,
                context: format!("{:?} statement {}", self.source, index),
            },
            None => panic!(
                "{:?}: Expected a statement at {}, found {} statements",
                self.source,
                index,
                self.nodes.len()
            ),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    pub(crate) node: &'a Node,
    pub(crate) context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.node.kind_name(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.node.kind_name()
        );
        self
    }

    pub fn sexp(self, expected: &str) -> Self {
        assert_eq!(to_sexp(self.node), expected, "{}: node shape", self.context);
        self
    }

    pub fn label(self, expected: Option<&str>) -> Self {
        assert_eq!(
            self.node.label(),
            expected,
            "{}: Expected label {:?}, found {:?}",
            self.context,
            expected,
            self.node.label()
        );
        self
    }

    pub fn span(self, start: usize, end: usize) -> Self {
        let span = self.node.span();
        assert_eq!(
            (span.start, span.end),
            (start, end),
            "{}: Expected span {}..{}, found {}",
            self.context,
            start,
            end,
            span
        );
        self
    }

    pub fn integer(self, expected: i32) -> Self {
        match self.node {
            Node::Integer(n) => assert_eq!(n.value, expected, "{}: integer value", self.context),
            other => panic!(
                "{}: Expected Integer, found {}",
                self.context,
                other.kind_name()
            ),
        }
        self
    }

    pub fn float(self, expected: f64) -> Self {
        match self.node {
            Node::Float(n) => assert_eq!(n.value, expected, "{}: float value", self.context),
            other => panic!(
                "{}: Expected Float, found {}",
                self.context,
                other.kind_name()
            ),
        }
        self
    }

    /// Assert an identifier with the given name and definition flag
    pub fn identifier(self, name: &str, is_definition: bool) -> Self {
        match self.node.as_identifier() {
            Some(ident) => {
                assert_eq!(ident.name, name, "{}: identifier name", self.context);
                assert_eq!(
                    ident.is_definition(),
                    is_definition,
                    "{}: definition flag of '{}'",
                    self.context,
                    name
                );
            }
            None => panic!(
                "{}: Expected Identifier, found {}",
                self.context,
                self.node.kind_name()
            ),
        }
        self
    }

    /// Access the underlying node for checks the fluent API does not cover
    pub fn node(&self) -> &'a Node {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_assertions() {
        assert_program("x = 1; 2.5")
            .statement_count(2)
            .sexp("(= x 1) 2.5")
            .statement(1)
            .kind("Float")
            .float(2.5)
            .span(7, 10);
    }

    #[test]
    #[should_panic(expected = "Expected Integer, found Identifier")]
    fn test_kind_mismatch_panics() {
        assert_program("a").statement(0).integer(1);
    }

    #[test]
    #[should_panic(expected = "Failed to build")]
    fn test_build_failure_panics() {
        assert_program("var 1;");
    }
}
