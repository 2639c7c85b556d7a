//! CLI support for ccslayout
//!
//! Provides programmatic access to the `ccslayout` commands so other tools
//! can embed rule checking without spawning the binary.

mod check;

pub use check::{execute_check, execute_tokens, CheckOptions, CheckResult};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Rule did not parse
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Rule could not be scanned
    #[error("Lexical error: {0}")]
    Lex(#[from] crate::LexError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No rule provided
    #[error("No rule provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,
}
