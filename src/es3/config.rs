//! Build configuration
//!
//! Knobs shared by the parser and the AST builder. Configuration can be written in YAML; keys
//! that are left out keep their defaults:
//!
//! ```yaml
//! max_depth: 256
//! ```
//!
//! - Use `BuildConfig::default()` for the built-in settings
//! - Use `BuildConfig::from_yaml_str()` to load settings from a string
//! - Use `BuildConfig::from_yaml_file()` to load settings from a file

use crate::es3::parsing::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Deepest statement/expression nesting the parser and the builder accept before failing
    /// with a nesting error instead of exhausting the stack.
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BuildConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Load a configuration from YAML text
    pub fn from_yaml_str(yaml_str: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml_str)
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&content)?)
    }
}
