//! # Layout Rules - Abstract Syntax Tree
//!
//! A layout rule assigns a value to one attribute of a UI element:
//!
//! ```text
//! attribute OP value
//! ```
//!
//! where `OP` is `=`, `+=`, `-=`, `*=` or `/=`. The parser turns a rule into
//! a three-node tree that a layout engine walks and applies.
//!
//! ## Submodules
//!
//! - **[tokens]** - Lexical categories produced by a classifier
//! - **[operators]** - The five assignment operators
//! - **[node]** - Tree nodes, node construction and teardown
//!
//! ## Tree Shape
//!
//! ```text
//! width += 25%
//!
//!        ADD_ASSIGN
//!        /        \
//!   ATTR(width)  PERCENTAGE(25)
//! ```
//!
//! The root is always an operator node. Its left child is the attribute, its
//! right child is a single literal. Leaves have no children.
//!
//! ## Values
//!
//! | Literal      | Node type            | Payload            |
//! |--------------|----------------------|--------------------|
//! | `10`, `4px`  | `NUMBER`             | `f64`              |
//! | `25%`        | `PERCENTAGE`         | `f64`              |
//! | `50%w`       | `PERCENTAGE_H`       | `f64`              |
//! | `50%h`       | `PERCENTAGE_V`       | `f64`              |
//! | `10,20`      | `COORD`              | text as written    |
//! | `10%,20`     | `COORD_PERCENTAGE`   | text as written    |
//! | `10%w,20`    | `COORD_PERCENTAGE_H` | text as written    |
//! | `10,20%h`    | `COORD_PERCENTAGE_V` | text as written    |
//! | `nil`        | `NIL`                | none               |
//!
//! Resolving percentages and coordinate text against an element is left to
//! the consumer.
//!
//! ## Lifetime
//!
//! Every node owns its children. [`release`] consumes a tree and reports how
//! many nodes and text buffers it freed:
//!
//! ```
//! use ccslayout::{parse_rule, release};
//!
//! let tree = parse_rule("pos *= 10,20").unwrap();
//! let stats = release(Some(tree));
//! assert_eq!(stats.nodes, 3);
//! assert_eq!(stats.buffers, 2); // attribute name and coordinate text
//! ```
pub mod node;
pub mod operators;
pub mod tokens;

pub use node::{create_node, release, Ast, BuildError, NodeKind, NodeType, ReleaseStats};
pub use operators::AssignOp;
pub use tokens::Token;
