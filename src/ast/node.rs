use std::any::Any;
use std::fmt;
use std::ops::{Add, AddAssign};

use thiserror::Error;

use crate::ast::{AssignOp, Token};

/// What a node represents, without its payload.
///
/// This is the tag consumers switch on. It is always derived from the
/// node's [`NodeKind`], so it can never disagree with the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Attr,
    Number,
    Percentage,
    PercentageH,
    PercentageV,
    Coord,
    CoordPercentage,
    CoordPercentageH,
    CoordPercentageV,
    Nil,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl NodeType {
    /// Legacy integer tag, identical to the token code the node was built from.
    pub fn code(self) -> i32 {
        match self {
            NodeType::Assign => '=' as i32,
            NodeType::Attr => 258,
            NodeType::Number => 259,
            NodeType::Percentage => 260,
            NodeType::PercentageH => 261,
            NodeType::PercentageV => 262,
            NodeType::Coord => 263,
            NodeType::CoordPercentage => 264,
            NodeType::CoordPercentageH => 265,
            NodeType::CoordPercentageV => 266,
            NodeType::Nil => 267,
            NodeType::AddAssign => 268,
            NodeType::SubAssign => 269,
            NodeType::MulAssign => 270,
            NodeType::DivAssign => 271,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeType::Attr => "ATTR",
            NodeType::Number => "NUMBER",
            NodeType::Percentage => "PERCENTAGE",
            NodeType::PercentageH => "PERCENTAGE_H",
            NodeType::PercentageV => "PERCENTAGE_V",
            NodeType::Coord => "COORD",
            NodeType::CoordPercentage => "COORD_PERCENTAGE",
            NodeType::CoordPercentageH => "COORD_PERCENTAGE_H",
            NodeType::CoordPercentageV => "COORD_PERCENTAGE_V",
            NodeType::Nil => "NIL",
            NodeType::Assign => "ASSIGN",
            NodeType::AddAssign => "ADD_ASSIGN",
            NodeType::SubAssign => "SUB_ASSIGN",
            NodeType::MulAssign => "MUL_ASSIGN",
            NodeType::DivAssign => "DIV_ASSIGN",
        }
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            NodeType::Assign
                | NodeType::AddAssign
                | NodeType::SubAssign
                | NodeType::MulAssign
                | NodeType::DivAssign
        )
    }

    /// True for the literal types that may appear on the right of an operator.
    pub fn is_value(self) -> bool {
        !self.is_operator() && self != NodeType::Attr
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node payload. Each variant carries only what its type needs.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Attribute reference
    Attr(String),
    Number(f64),
    Percentage(f64),
    /// Percentage of the reference width
    PercentageH(f64),
    /// Percentage of the reference height
    PercentageV(f64),
    /// Coordinate text, interpreted by the consumer
    Coord(String),
    CoordPercentage(String),
    CoordPercentageH(String),
    CoordPercentageV(String),
    Nil,
    /// Assignment operator; the only kind with children
    Op(AssignOp),
}

impl NodeKind {
    /// Converts a reduced token into the node payload it produces.
    ///
    /// Returns `None` for `Eof`, the one category that never becomes a node.
    pub fn from_token(token: Token) -> Option<NodeKind> {
        let kind = match token {
            Token::Attr(name) => NodeKind::Attr(name),
            Token::Number(n) => NodeKind::Number(n),
            Token::Percentage(n) => NodeKind::Percentage(n),
            Token::PercentageH(n) => NodeKind::PercentageH(n),
            Token::PercentageV(n) => NodeKind::PercentageV(n),
            Token::Coord(text) => NodeKind::Coord(text),
            Token::CoordPercentage(text) => NodeKind::CoordPercentage(text),
            Token::CoordPercentageH(text) => NodeKind::CoordPercentageH(text),
            Token::CoordPercentageV(text) => NodeKind::CoordPercentageV(text),
            Token::Nil => NodeKind::Nil,
            Token::Assign => NodeKind::Op(AssignOp::Assign),
            Token::AddAssign => NodeKind::Op(AssignOp::Add),
            Token::SubAssign => NodeKind::Op(AssignOp::Subtract),
            Token::MulAssign => NodeKind::Op(AssignOp::Multiply),
            Token::DivAssign => NodeKind::Op(AssignOp::Divide),
            Token::Eof => return None,
        };
        Some(kind)
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Attr(_) => NodeType::Attr,
            NodeKind::Number(_) => NodeType::Number,
            NodeKind::Percentage(_) => NodeType::Percentage,
            NodeKind::PercentageH(_) => NodeType::PercentageH,
            NodeKind::PercentageV(_) => NodeType::PercentageV,
            NodeKind::Coord(_) => NodeType::Coord,
            NodeKind::CoordPercentage(_) => NodeType::CoordPercentage,
            NodeKind::CoordPercentageH(_) => NodeType::CoordPercentageH,
            NodeKind::CoordPercentageV(_) => NodeType::CoordPercentageV,
            NodeKind::Nil => NodeType::Nil,
            NodeKind::Op(AssignOp::Assign) => NodeType::Assign,
            NodeKind::Op(AssignOp::Add) => NodeType::AddAssign,
            NodeKind::Op(AssignOp::Subtract) => NodeType::SubAssign,
            NodeKind::Op(AssignOp::Multiply) => NodeType::MulAssign,
            NodeKind::Op(AssignOp::Divide) => NodeType::DivAssign,
        }
    }

    fn owns_buffer(&self) -> bool {
        matches!(
            self,
            NodeKind::Attr(_)
                | NodeKind::Coord(_)
                | NodeKind::CoordPercentage(_)
                | NodeKind::CoordPercentageH(_)
                | NodeKind::CoordPercentageV(_)
        )
    }
}

/// Rejected node shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{node_type} node takes {expected} children, got {found}")]
    Arity {
        node_type: NodeType,
        expected: usize,
        found: usize,
    },

    #[error("left operand of {node_type} must be an attribute, got {found}")]
    LeftNotAttribute { node_type: NodeType, found: NodeType },

    #[error("right operand of {node_type} must be a value, got {found}")]
    RightNotValue { node_type: NodeType, found: NodeType },
}

/// Counts reported by [`release`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseStats {
    /// Nodes freed, root included
    pub nodes: usize,
    /// Owned text buffers freed (attribute names and coordinate text)
    pub buffers: usize,
}

impl Add for ReleaseStats {
    type Output = ReleaseStats;

    fn add(self, other: ReleaseStats) -> ReleaseStats {
        ReleaseStats {
            nodes: self.nodes + other.nodes,
            buffers: self.buffers + other.buffers,
        }
    }
}

impl AddAssign for ReleaseStats {
    fn add_assign(&mut self, other: ReleaseStats) {
        *self = *self + other;
    }
}

/// A node of a parsed rule.
///
/// A rule parses into one operator node whose left child is the attribute
/// and whose right child is the value literal. Children are owned; moving
/// a node into [`create_node`] moves its whole subtree.
pub struct Ast {
    kind: NodeKind,
    left: Option<Box<Ast>>,
    right: Option<Box<Ast>>,
    data: Option<Box<dyn Any + Send + Sync>>,
}

/// Builds a node from a payload and its operands.
///
/// Operator kinds need an attribute on the left and a value on the right;
/// every other kind is a leaf. On a shape mismatch the operands are released
/// and the error returned, so nothing passed in outlives the call.
pub fn create_node(
    kind: NodeKind,
    left: Option<Ast>,
    right: Option<Ast>,
) -> Result<Ast, BuildError> {
    let node_type = kind.node_type();

    if let Err(err) = check_shape(node_type, left.as_ref(), right.as_ref()) {
        let stats = release(left) + release(right);
        tracing::debug!(
            %node_type,
            released_nodes = stats.nodes,
            "rejected node: {}",
            err
        );
        return Err(err);
    }

    Ok(Ast {
        kind,
        left: left.map(Box::new),
        right: right.map(Box::new),
        data: None,
    })
}

fn check_shape(
    node_type: NodeType,
    left: Option<&Ast>,
    right: Option<&Ast>,
) -> Result<(), BuildError> {
    let found = usize::from(left.is_some()) + usize::from(right.is_some());

    if !node_type.is_operator() {
        if found != 0 {
            return Err(BuildError::Arity {
                node_type,
                expected: 0,
                found,
            });
        }
        return Ok(());
    }

    let (Some(left), Some(right)) = (left, right) else {
        return Err(BuildError::Arity {
            node_type,
            expected: 2,
            found,
        });
    };

    if left.node_type() != NodeType::Attr {
        return Err(BuildError::LeftNotAttribute {
            node_type,
            found: left.node_type(),
        });
    }
    if !right.node_type().is_value() {
        return Err(BuildError::RightNotValue {
            node_type,
            found: right.node_type(),
        });
    }
    Ok(())
}

/// Frees a tree: left subtree, right subtree, owned text, extension slot,
/// then the node. `None` is a no-op.
pub fn release(tree: Option<Ast>) -> ReleaseStats {
    match tree {
        Some(ast) => ast.release(),
        None => ReleaseStats::default(),
    }
}

impl Ast {
    /// Leaf node for a payload-carrying kind. Shorthand for
    /// `create_node(kind, None, None)` when `kind` is known not to be an
    /// operator.
    pub fn leaf(kind: NodeKind) -> Result<Ast, BuildError> {
        create_node(kind, None, None)
    }

    /// Consumes the tree and frees every node below it exactly once.
    pub fn release(self) -> ReleaseStats {
        let Ast {
            kind,
            left,
            right,
            data,
        } = self;

        let mut stats = release(left.map(|node| *node));
        stats += release(right.map(|node| *node));

        if kind.owns_buffer() {
            stats.buffers += 1;
        }
        drop(kind);
        drop(data);
        stats.nodes += 1;
        stats
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn left(&self) -> Option<&Ast> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Ast> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn op(&self) -> Option<AssignOp> {
        match self.kind {
            NodeKind::Op(op) => Some(op),
            _ => None,
        }
    }

    pub fn attr_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Attr(name) => Some(name),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Percentage value for any of the three percentage kinds.
    pub fn percentage(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Percentage(n) | NodeKind::PercentageH(n) | NodeKind::PercentageV(n) => {
                Some(n)
            }
            _ => None,
        }
    }

    /// Coordinate text for any of the four coordinate kinds.
    pub fn coord(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Coord(text)
            | NodeKind::CoordPercentage(text)
            | NodeKind::CoordPercentageH(text)
            | NodeKind::CoordPercentageV(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, NodeKind::Nil)
    }

    /// `(attribute, operator, value)` of a rule root.
    pub fn rule_parts(&self) -> Option<(&str, AssignOp, &Ast)> {
        let op = self.op()?;
        let attr = self.left()?.attr_name()?;
        Some((attr, op, self.right()?))
    }

    // Extension slot. Never read by the parser; dropped with the node.

    pub fn data(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.data.as_deref()
    }

    pub fn set_data(&mut self, data: Box<dyn Any + Send + Sync>) {
        self.data = Some(data);
    }

    pub fn take_data(&mut self) -> Option<Box<dyn Any + Send + Sync>> {
        self.data.take()
    }
}

// The extension slot has no defined owner outside the node, so it is never
// cloned and never compared.
impl Clone for Ast {
    fn clone(&self) -> Self {
        Ast {
            kind: self.kind.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
            data: None,
        }
    }
}

impl PartialEq for Ast {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.left == other.left && self.right == other.right
    }
}

impl fmt::Debug for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Ast");
        s.field("kind", &self.kind);
        if let Some(left) = &self.left {
            s.field("left", left);
        }
        if let Some(right) = &self.right {
            s.field("right", right);
        }
        if self.data.is_some() {
            s.field("data", &"..");
        }
        s.finish()
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Op(op) => {
                if let Some(left) = &self.left {
                    write!(f, "{} ", left)?;
                }
                write!(f, "{}", op)?;
                if let Some(right) = &self.right {
                    write!(f, " {}", right)?;
                }
                Ok(())
            }
            NodeKind::Attr(name) => write!(f, "{}", name),
            NodeKind::Number(n) => write!(f, "{}", n),
            NodeKind::Percentage(n) => write!(f, "{}%", n),
            NodeKind::PercentageH(n) => write!(f, "{}%w", n),
            NodeKind::PercentageV(n) => write!(f, "{}%h", n),
            NodeKind::Coord(text)
            | NodeKind::CoordPercentage(text)
            | NodeKind::CoordPercentageH(text)
            | NodeKind::CoordPercentageV(text) => write!(f, "{}", text),
            NodeKind::Nil => write!(f, "nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> Ast {
        Ast::leaf(NodeKind::Attr(name.to_string())).unwrap()
    }

    #[test]
    fn test_leaf_release_counts_buffer_once() {
        let coord = Ast::leaf(NodeKind::Coord("10,20".to_string())).unwrap();
        assert_eq!(coord.release(), ReleaseStats { nodes: 1, buffers: 1 });

        let number = Ast::leaf(NodeKind::Number(3.0)).unwrap();
        assert_eq!(number.release(), ReleaseStats { nodes: 1, buffers: 0 });
    }

    #[test]
    fn test_operator_node_owns_both_children() {
        let value = Ast::leaf(NodeKind::Percentage(25.0)).unwrap();
        let root = create_node(NodeKind::Op(AssignOp::Add), Some(attr("width")), Some(value)).unwrap();

        assert_eq!(root.node_type(), NodeType::AddAssign);
        assert_eq!(root.left().and_then(Ast::attr_name), Some("width"));
        assert_eq!(root.right().and_then(Ast::percentage), Some(25.0));
        assert_eq!(root.release(), ReleaseStats { nodes: 3, buffers: 1 });
    }

    #[test]
    fn test_leaf_with_children_is_rejected() {
        let err = create_node(NodeKind::Nil, Some(attr("x")), None).unwrap_err();
        assert_eq!(
            err,
            BuildError::Arity {
                node_type: NodeType::Nil,
                expected: 0,
                found: 1
            }
        );
    }

    #[test]
    fn test_swapped_operands_are_rejected() {
        let value = Ast::leaf(NodeKind::Number(1.0)).unwrap();
        let err = create_node(NodeKind::Op(AssignOp::Assign), Some(value), Some(attr("x"))).unwrap_err();
        assert!(matches!(err, BuildError::LeftNotAttribute { .. }));
    }

    #[test]
    fn test_clone_drops_extension_slot() {
        let mut node = attr("x");
        node.set_data(Box::new(7u32));
        let copy = node.clone();

        assert!(copy.data().is_none());
        assert_eq!(node.data().and_then(|d| d.downcast_ref::<u32>()), Some(&7));
        assert_eq!(copy, node);
    }
}
