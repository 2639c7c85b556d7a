use std::fmt;

use crate::ast::Token;

/// Assignment operators a rule can apply to its attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// Replace (`=`)
    Assign,
    /// Add to the current value (`+=`)
    Add,
    /// Subtract from the current value (`-=`)
    Subtract,
    /// Multiply the current value (`*=`)
    Multiply,
    /// Divide the current value (`/=`)
    Divide,
}

impl AssignOp {
    pub fn from_token(token: &Token) -> Option<AssignOp> {
        match token {
            Token::Assign => Some(AssignOp::Assign),
            Token::AddAssign => Some(AssignOp::Add),
            Token::SubAssign => Some(AssignOp::Subtract),
            Token::MulAssign => Some(AssignOp::Multiply),
            Token::DivAssign => Some(AssignOp::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Subtract => "-=",
            AssignOp::Multiply => "*=",
            AssignOp::Divide => "/=",
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
