// tests/ast_tests.rs

use ccslayout::ast::{
    create_node, release, AssignOp, Ast, BuildError, NodeKind, NodeType, ReleaseStats, Token,
};
use ccslayout::parse_rule;

fn leaf(kind: NodeKind) -> Ast {
    create_node(kind, None, None).unwrap()
}

// ============================================================================
// Node Construction
// ============================================================================

#[test]
fn test_create_literal_leaves() {
    let test_cases = vec![
        (NodeKind::Number(1.0), NodeType::Number),
        (NodeKind::Percentage(1.0), NodeType::Percentage),
        (NodeKind::PercentageH(1.0), NodeType::PercentageH),
        (NodeKind::PercentageV(1.0), NodeType::PercentageV),
        (NodeKind::Coord("1,2".to_string()), NodeType::Coord),
        (NodeKind::CoordPercentage("1%,2".to_string()), NodeType::CoordPercentage),
        (NodeKind::CoordPercentageH("1%w,2".to_string()), NodeType::CoordPercentageH),
        (NodeKind::CoordPercentageV("1%h,2".to_string()), NodeType::CoordPercentageV),
        (NodeKind::Nil, NodeType::Nil),
        (NodeKind::Attr("x".to_string()), NodeType::Attr),
    ];

    for (kind, node_type) in test_cases {
        let node = leaf(kind);
        assert_eq!(node.node_type(), node_type);
        assert!(node.is_leaf());
        assert!(node.left().is_none() && node.right().is_none());
    }
}

#[test]
fn test_payload_accessors_follow_node_type() {
    let number = leaf(NodeKind::Number(3.0));
    assert_eq!(number.number(), Some(3.0));
    assert_eq!(number.percentage(), None);
    assert_eq!(number.coord(), None);
    assert_eq!(number.attr_name(), None);

    let width = leaf(NodeKind::PercentageH(40.0));
    assert_eq!(width.percentage(), Some(40.0));
    assert_eq!(width.number(), None);

    let coord = leaf(NodeKind::CoordPercentageV("0,100%h".to_string()));
    assert_eq!(coord.coord(), Some("0,100%h"));
    assert_eq!(coord.percentage(), None);
    assert!(!coord.is_nil());
}

#[test]
fn test_create_operator_node() {
    let root = create_node(
        NodeKind::Op(AssignOp::Subtract),
        Some(leaf(NodeKind::Attr("top".to_string()))),
        Some(leaf(NodeKind::Number(8.0))),
    )
    .unwrap();

    assert_eq!(root.node_type(), NodeType::SubAssign);
    assert_eq!(root.to_string(), "top -= 8");
    assert_eq!(root, parse_rule("top -= 8").unwrap());
}

#[test]
fn test_operator_needs_both_operands() {
    let err = create_node(
        NodeKind::Op(AssignOp::Assign),
        Some(leaf(NodeKind::Attr("x".to_string()))),
        None,
    )
    .unwrap_err();

    assert_eq!(
        err,
        BuildError::Arity {
            node_type: NodeType::Assign,
            expected: 2,
            found: 1,
        }
    );
    assert_eq!(err.to_string(), "ASSIGN node takes 2 children, got 1");
}

#[test]
fn test_operator_rejects_operator_value() {
    let inner = parse_rule("x = 1").unwrap();
    let err = create_node(
        NodeKind::Op(AssignOp::Add),
        Some(leaf(NodeKind::Attr("y".to_string()))),
        Some(inner),
    )
    .unwrap_err();

    assert_eq!(
        err,
        BuildError::RightNotValue {
            node_type: NodeType::AddAssign,
            found: NodeType::Assign,
        }
    );
}

#[test]
fn test_kind_from_token() {
    assert_eq!(
        NodeKind::from_token(Token::PercentageV(5.0)),
        Some(NodeKind::PercentageV(5.0))
    );
    assert_eq!(
        NodeKind::from_token(Token::DivAssign),
        Some(NodeKind::Op(AssignOp::Divide))
    );
    assert_eq!(NodeKind::from_token(Token::Eof), None);
}

#[test]
fn test_node_codes_match_token_codes() {
    let tokens = vec![
        Token::Attr("x".to_string()),
        Token::Number(1.0),
        Token::Percentage(1.0),
        Token::PercentageH(1.0),
        Token::PercentageV(1.0),
        Token::Coord("1,1".to_string()),
        Token::CoordPercentage("1%,1".to_string()),
        Token::CoordPercentageH("1%w,1".to_string()),
        Token::CoordPercentageV("1%h,1".to_string()),
        Token::Nil,
        Token::Assign,
        Token::AddAssign,
        Token::SubAssign,
        Token::MulAssign,
        Token::DivAssign,
    ];

    for token in tokens {
        let code = token.code();
        let kind = NodeKind::from_token(token).unwrap();
        assert_eq!(kind.node_type().code(), code);
    }
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_release_nothing() {
    assert_eq!(release(None), ReleaseStats::default());
}

#[test]
fn test_release_leaf_buffers() {
    assert_eq!(
        release(Some(leaf(NodeKind::Coord("10,20".to_string())))),
        ReleaseStats { nodes: 1, buffers: 1 }
    );
    assert_eq!(
        release(Some(leaf(NodeKind::Nil))),
        ReleaseStats { nodes: 1, buffers: 0 }
    );
}

#[test]
fn test_release_parsed_rules_once() {
    let test_cases = vec![
        ("x = 10", ReleaseStats { nodes: 3, buffers: 1 }),
        ("width += 25%", ReleaseStats { nodes: 3, buffers: 1 }),
        ("opacity = nil", ReleaseStats { nodes: 3, buffers: 1 }),
        ("pos *= 10,20", ReleaseStats { nodes: 3, buffers: 2 }),
        ("pos /= 10%w,20", ReleaseStats { nodes: 3, buffers: 2 }),
    ];

    for (input, expected) in test_cases {
        let tree = parse_rule(input).unwrap();
        assert_eq!(tree.release(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_release_drops_extension_slot() {
    let mut tree = parse_rule("x = 1").unwrap();
    tree.set_data(Box::new(String::from("engine handle")));

    assert_eq!(tree.release(), ReleaseStats { nodes: 3, buffers: 1 });
}

#[test]
fn test_take_data_before_release() {
    let mut tree = parse_rule("x = 1").unwrap();
    tree.set_data(Box::new(42_i32));

    let data = tree.take_data().unwrap();
    assert!(tree.data().is_none());
    tree.release();

    assert_eq!(data.downcast_ref::<i32>(), Some(&42));
}

#[test]
fn test_trees_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Ast>();

    let handles: Vec<_> = ["x = 1", "y += 2%", "pos *= 3,4"]
        .into_iter()
        .map(|rule| std::thread::spawn(move || parse_rule(rule).map(Ast::release)))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap().nodes, 3);
    }
}
