//! Transform pipeline infrastructure
//!
//! Source text goes through three stages on its way to the AST: tokenization, parsing and
//! building. Each stage is a [`Runnable`]; stages are chained into a [`Transform`] whose
//! input and output types the compiler checks at every link:
//!
//! ```rust,ignore
//! let pipeline = Transform::from_fn(Ok)
//!     .then(Parsing::new())    // String → Option<ParseNode>
//!     .then(Building::new());  // Option<ParseNode> → Vec<Node>
//! ```
//!
//! Common pipelines are pre-built as statics in [`standard`]:
//!
//! ```rust,ignore
//! use es3_ast::es3::transforms::standard::STRING_TO_AST;
//!
//! let program = STRING_TO_AST.run("var a = 1;".to_string())?;
//! ```
//!
//! For most use cases, [`SourceLoader`](crate::es3::loader::SourceLoader) wraps these and
//! also handles reading and decoding files.
//!
//! # Module Organization
//!
//! - [`stages`]: Individual stages (tokenization, parsing, building)
//! - [`standard`]: Pre-built transform combinations

pub mod stages;
pub mod standard;

use std::fmt;

/// Error that can occur during transformation
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Stage failed; `offset` is the byte position of the failure when the stage knows it
    StageFailed {
        stage: String,
        message: String,
        offset: Option<usize>,
    },
}

impl TransformError {
    pub fn stage_failed(stage: &str, message: impl fmt::Display, offset: Option<usize>) -> Self {
        TransformError::StageFailed {
            stage: stage.to_string(),
            message: message.to_string(),
            offset,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        let TransformError::StageFailed { offset, .. } = self;
        *offset
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TransformError::StageFailed { stage, message, .. } = self;
        write!(f, "Stage '{}' failed: {}", stage, message)
    }
}

impl std::error::Error for TransformError {}

/// Trait for anything that can transform an input to an output
pub trait Runnable<I, O> {
    /// Execute this transformation on the input
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A composable transformation pipeline from `I` to `O`.
///
/// Transforms are `Send + Sync`, so pipelines can live in statics and be shared between
/// threads.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain a stage onto this transform, producing a transform from `I` to the stage's output.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a pre-built static transform onto this one.
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    /// Execute this transform on the given input
    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountStatements;
    impl Runnable<String, usize> for CountStatements {
        fn run(&self, input: String) -> Result<usize, TransformError> {
            Ok(input.matches(';').count())
        }
    }

    struct RejectEmpty;
    impl Runnable<usize, usize> for RejectEmpty {
        fn run(&self, input: usize) -> Result<usize, TransformError> {
            if input == 0 {
                Err(TransformError::stage_failed("count", "no statements", Some(0)))
            } else {
                Ok(input)
            }
        }
    }

    #[test]
    fn test_transform_from_fn() {
        let transform = Transform::from_fn(|source: String| Ok(source.len()));
        assert_eq!(transform.run("a;".to_string()).unwrap(), 2);
    }

    #[test]
    fn test_chained_stages() {
        let transform = Transform::from_fn(Ok)
            .then(CountStatements)
            .then(RejectEmpty);
        assert_eq!(transform.run("a; b; c;".to_string()).unwrap(), 3);
    }

    #[test]
    fn test_error_propagation() {
        let transform = Transform::from_fn(Ok)
            .then(CountStatements)
            .then(RejectEmpty);
        let err = transform.run("a".to_string()).unwrap_err();
        assert_eq!(err.offset(), Some(0));
        assert_eq!(err.to_string(), "Stage 'count' failed: no statements");
    }
}
