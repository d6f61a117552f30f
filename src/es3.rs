//! Main module for es3 library functionality

pub mod ast;
pub mod building;
pub mod config;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod nesting;
pub mod parsing;
pub mod testing;
pub mod token;
pub mod transforms;
