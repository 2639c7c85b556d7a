//! JSON rendering of rule trees.
//!
//! Layout tooling that does not link against this crate can consume the
//! tree as JSON. Every node carries its `type` name and legacy `code`;
//! leaves add their payload under `value` and operator nodes add `left`
//! and `right`.
//!
//! ```
//! use ccslayout::parse_rule;
//! use ccslayout::output::to_json;
//!
//! let tree = parse_rule("opacity = nil").unwrap();
//! assert_eq!(
//!     to_json(&tree),
//!     r#"{"code":61,"left":{"code":258,"type":"ATTR","value":"opacity"},"right":{"code":267,"type":"NIL"},"type":"ASSIGN"}"#
//! );
//! ```

use serde_json::{Map, Value};

use crate::ast::{Ast, NodeKind};

/// Converts a tree into a `serde_json::Value`.
pub fn ast_to_value(ast: &Ast) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::from(ast.node_type().name()));
    object.insert("code".to_string(), Value::from(ast.node_type().code()));

    let payload = match ast.kind() {
        NodeKind::Attr(text)
        | NodeKind::Coord(text)
        | NodeKind::CoordPercentage(text)
        | NodeKind::CoordPercentageH(text)
        | NodeKind::CoordPercentageV(text) => Some(Value::from(text.as_str())),
        NodeKind::Number(n)
        | NodeKind::Percentage(n)
        | NodeKind::PercentageH(n)
        | NodeKind::PercentageV(n) => serde_json::Number::from_f64(*n).map(Value::Number),
        NodeKind::Nil | NodeKind::Op(_) => None,
    };
    if let Some(payload) = payload {
        object.insert("value".to_string(), payload);
    }

    if let Some(left) = ast.left() {
        object.insert("left".to_string(), ast_to_value(left));
    }
    if let Some(right) = ast.right() {
        object.insert("right".to_string(), ast_to_value(right));
    }

    Value::Object(object)
}

pub fn to_json(ast: &Ast) -> String {
    ast_to_value(ast).to_string()
}

/// Indented form of [`to_json`], via the alternate `Display` of `Value`.
pub fn to_json_pretty(ast: &Ast) -> String {
    format!("{:#}", ast_to_value(ast))
}
