// tests/property_tests.rs

use ccslayout::ast::{NodeType, ReleaseStats};
use ccslayout::{parse_rule, ErrorKind};
use proptest::prelude::*;

fn attribute_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,12}".prop_filter("nil is a keyword", |name| name != "nil")
}

fn operator_strategy() -> impl Strategy<Value = (&'static str, NodeType)> {
    prop_oneof![
        Just(("=", NodeType::Assign)),
        Just(("+=", NodeType::AddAssign)),
        Just(("-=", NodeType::SubAssign)),
        Just(("*=", NodeType::MulAssign)),
        Just(("/=", NodeType::DivAssign)),
    ]
}

fn scalar_strategy() -> impl Strategy<Value = String> {
    (-1000i32..1000, 0u32..100).prop_map(|(whole, frac)| format!("{}.{}", whole, frac))
}

fn value_strategy() -> impl Strategy<Value = (String, NodeType)> {
    prop_oneof![
        scalar_strategy().prop_map(|n| (n, NodeType::Number)),
        scalar_strategy().prop_map(|n| (format!("{}px", n), NodeType::Number)),
        scalar_strategy().prop_map(|n| (format!("{}%", n), NodeType::Percentage)),
        scalar_strategy().prop_map(|n| (format!("{}%w", n), NodeType::PercentageH)),
        scalar_strategy().prop_map(|n| (format!("{}%h", n), NodeType::PercentageV)),
        (scalar_strategy(), scalar_strategy())
            .prop_map(|(a, b)| (format!("{},{}", a, b), NodeType::Coord)),
        (scalar_strategy(), scalar_strategy())
            .prop_map(|(a, b)| (format!("{}%,{}", a, b), NodeType::CoordPercentage)),
        (scalar_strategy(), scalar_strategy())
            .prop_map(|(a, b)| (format!("{}%w,{}", a, b), NodeType::CoordPercentageH)),
        (scalar_strategy(), scalar_strategy())
            .prop_map(|(a, b)| (format!("{},{}%h", a, b), NodeType::CoordPercentageV)),
        Just(("nil".to_string(), NodeType::Nil)),
    ]
}

proptest! {
    #[test]
    fn test_well_formed_rules_parse(
        attr in attribute_strategy(),
        (op, op_type) in operator_strategy(),
        (value, value_type) in value_strategy(),
    ) {
        let rule = format!("{} {} {}", attr, op, value);
        let tree = parse_rule(&rule);
        prop_assert!(tree.is_ok(), "Failed to parse: {}", rule);

        let tree = tree.unwrap();
        prop_assert_eq!(tree.node_type(), op_type);
        prop_assert_eq!(tree.left().and_then(|n| n.attr_name()), Some(attr.as_str()));
        prop_assert_eq!(tree.right().map(|n| n.node_type()), Some(value_type));

        let coord_buffers = usize::from(tree.right().and_then(|n| n.coord()).is_some());
        prop_assert_eq!(tree.release(), ReleaseStats { nodes: 3, buffers: 1 + coord_buffers });
    }

    #[test]
    fn test_missing_value_never_parses(
        attr in attribute_strategy(),
        (op, _) in operator_strategy(),
    ) {
        let rule = format!("{} {}", attr, op);
        let err = parse_rule(&rule).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_trailing_tokens_never_parse(
        attr in attribute_strategy(),
        (op, _) in operator_strategy(),
        (value, _) in value_strategy(),
        (extra, _) in value_strategy(),
    ) {
        let rule = format!("{} {} {} {}", attr, op, value, extra);
        prop_assert!(parse_rule(&rule).is_err(), "Accepted: {}", rule);
    }

    #[test]
    fn test_arbitrary_input_never_panics(input in "\\PC{0,24}") {
        let _ = parse_rule(&input);
    }
}
