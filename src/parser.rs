use std::collections::TryReserveError;
use std::mem;

use thiserror::Error;

use crate::{
    ast::{create_node, AssignOp, Ast, BuildError, NodeKind, ReleaseStats, Token},
    lexer::{LexError, Lexer, TokenSource},
};

/// Target for the shift/reduce events emitted when tracing is on.
pub const TRACE_TARGET: &str = "ccslayout::parser";

/// Per-parse settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Emit a `debug` event for every shifted token and every built node
    pub trace: bool,
    /// Reject rules longer than this many bytes before scanning them
    pub max_len: Option<usize>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }
}

/// Broad failure classes of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The classifier could not categorize the input
    Lexical,
    /// The token sequence is not `attribute OP value`
    Syntax,
    /// A buffer could not be allocated
    Allocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lexical(LexError),

    #[error("expected {expected}, found {found} at token {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("empty rule")]
    EmptyRule,

    #[error("unexpected {found} after complete rule at token {position}")]
    TrailingInput { found: String, position: usize },

    #[error("invalid tree: {0}")]
    Build(#[from] BuildError),

    #[error("rule is {len} bytes long, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("allocation failed: {0}")]
    Allocation(TryReserveError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lexical(_) => ErrorKind::Lexical,
            ParseError::Allocation(_) => ErrorKind::Allocation,
            ParseError::UnexpectedToken { .. }
            | ParseError::EmptyRule
            | ParseError::TrailingInput { .. }
            | ParseError::Build(_)
            | ParseError::TooLong { .. } => ErrorKind::Syntax,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::Allocation(e) => ParseError::Allocation(e),
            LexError::AfterEof { found, position } => ParseError::TrailingInput { found, position },
            other => ParseError::Lexical(other),
        }
    }
}

/// Recognizes one `attribute OP value` rule from a token source.
pub struct Parser<S = Lexer> {
    source: S,
    current_token: Token,
    position: usize,
    options: ParseOptions,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S) -> Result<Self, ParseError> {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(mut source: S, options: ParseOptions) -> Result<Self, ParseError> {
        let current_token = source.next_token()?;
        Ok(Parser {
            source,
            current_token,
            position: 0,
            options,
        })
    }

    /// Shifts the current token and returns it.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.source.next_token()?;
        let token = mem::replace(&mut self.current_token, next);
        if self.options.trace {
            tracing::debug!(
                target: TRACE_TARGET,
                position = self.position,
                code = token.code(),
                "shift {}",
                token.describe()
            );
        }
        self.position += 1;
        Ok(token)
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current_token.label(),
            position: self.position,
        }
    }

    /// Turns a shifted token into a leaf node.
    fn reduce(&self, token: Token) -> Result<Ast, ParseError> {
        let Some(kind) = NodeKind::from_token(token) else {
            return Err(ParseError::UnexpectedToken {
                expected: "literal",
                found: Token::Eof.label(),
                position: self.position,
            });
        };
        let node = create_node(kind, None, None)?;
        if self.options.trace {
            tracing::debug!(target: TRACE_TARGET, node = %node.node_type(), "reduce");
        }
        Ok(node)
    }

    /// Releases nodes built before a failure and hands the error back.
    fn abandon(&self, err: ParseError, built: impl IntoIterator<Item = Ast>) -> ParseError {
        let stats = built
            .into_iter()
            .fold(ReleaseStats::default(), |stats, node| stats + node.release());
        if self.options.trace {
            tracing::debug!(
                target: TRACE_TARGET,
                released_nodes = stats.nodes,
                released_buffers = stats.buffers,
                "abandon partial rule"
            );
        }
        err
    }

    fn parse_attribute(&mut self) -> Result<Ast, ParseError> {
        if !matches!(self.current_token, Token::Attr(_)) {
            return Err(self.unexpected("attribute"));
        }
        let token = self.advance()?;
        self.reduce(token)
    }

    fn parse_operator(&mut self) -> Result<AssignOp, ParseError> {
        let Some(op) = AssignOp::from_token(&self.current_token) else {
            return Err(self.unexpected("assignment operator"));
        };
        self.advance()?;
        Ok(op)
    }

    fn parse_value(&mut self) -> Result<Ast, ParseError> {
        if !self.current_token.is_value() {
            return Err(self.unexpected("value"));
        }
        let token = self.advance()?;
        self.reduce(token)
    }

    fn parse_rule(&mut self) -> Result<Ast, ParseError> {
        if self.check(&Token::Eof) {
            return Err(ParseError::EmptyRule);
        }

        let attr = self.parse_attribute()?;

        let op = match self.parse_operator() {
            Ok(op) => op,
            Err(err) => return Err(self.abandon(err, [attr])),
        };

        let value = match self.parse_value() {
            Ok(value) => value,
            Err(err) => return Err(self.abandon(err, [attr])),
        };

        if !self.check(&Token::Eof) {
            let err = ParseError::TrailingInput {
                found: self.current_token.label(),
                position: self.position,
            };
            return Err(self.abandon(err, [attr, value]));
        }

        let root = create_node(NodeKind::Op(op), Some(attr), Some(value))?;
        if self.options.trace {
            tracing::debug!(target: TRACE_TARGET, node = %root.node_type(), "accept");
        }
        Ok(root)
    }

    /// Parses exactly one rule and requires the source to end after it.
    ///
    /// On failure every node built so far has been released; no partial
    /// tree is returned.
    pub fn parse(&mut self) -> Result<Ast, ParseError> {
        let result = self.parse_rule();
        if let Err(err) = &result {
            tracing::debug!(kind = ?err.kind(), "rule rejected: {}", err);
        }
        result
    }
}

/// Parses a rule such as `width += 25%` with default options.
pub fn parse_rule(rule: &str) -> Result<Ast, ParseError> {
    parse_rule_with(rule, &ParseOptions::default())
}

pub fn parse_rule_with(rule: &str, options: &ParseOptions) -> Result<Ast, ParseError> {
    if let Some(max) = options.max_len
        && rule.len() > max
    {
        return Err(ParseError::TooLong {
            len: rule.len(),
            max,
        });
    }

    let _span = options
        .trace
        .then(|| tracing::debug_span!(target: TRACE_TARGET, "parse_rule", rule).entered());

    let mut parser = Parser::with_options(Lexer::new(rule), options.clone())?;
    parser.parse()
}
