//! Check layout rules and show their trees

use crate::output::{to_json, to_json_pretty};
use crate::{parse_rule_with, Lexer, ParseOptions};
use super::CliError;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The rule to check
    pub rule: Option<String>,
    /// Print the tree as JSON instead of the canonical rule
    pub json: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Log every shift and reduction
    pub trace: bool,
    /// Reject rules longer than this many bytes
    pub max_len: Option<usize>,
}

impl CheckOptions {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            trace: self.trace,
            max_len: self.max_len,
        }
    }
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Rule parsed; canonical rule text
    Canonical(String),
    /// Rule parsed; JSON tree
    Json(String),
}

/// Parse the rule and render it. The tree is released before returning.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let rule = options.rule.as_deref().ok_or(CliError::NoInput)?;
    let tree = parse_rule_with(rule.trim(), &options.parse_options())?;

    let result = if options.json {
        let json = if options.pretty {
            to_json_pretty(&tree)
        } else {
            to_json(&tree)
        };
        CheckResult::Json(json)
    } else {
        CheckResult::Canonical(tree.to_string())
    };

    let stats = tree.release();
    tracing::debug!(nodes = stats.nodes, buffers = stats.buffers, "released rule tree");
    Ok(result)
}

/// Classify the rule and list its tokens as `code category lexeme` lines.
pub fn execute_tokens(rule: &str) -> Result<Vec<String>, CliError> {
    let tokens = Lexer::tokenize(rule.trim())?;
    Ok(tokens
        .iter()
        .map(|token| format!("{:>3} {:<28} {}", token.code(), token.describe(), token))
        .collect())
}
