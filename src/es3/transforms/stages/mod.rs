//! Individual transformation stages
//!
//! Each stage implements the `Runnable` trait and reports its failures as
//! `TransformError::StageFailed` with the stage's name and, where known, the byte offset.

pub mod building;
pub mod parsing;
pub mod tokenization;

pub use building::Building;
pub use parsing::Parsing;
pub use tokenization::Tokenization;
