//! Property-based tests for numeric literal building
//!
//! The rule under test: token text containing `.` becomes a float with exactly the value of
//! that text, anything else must fit a signed 32-bit integer.

use es3_ast::es3::ast::Node;
use es3_ast::es3::loader::SourceLoader;
use proptest::prelude::*;

fn build_single(source: &str) -> Result<Node, String> {
    let mut nodes = SourceLoader::from_string(source)
        .build()
        .map_err(|err| err.to_string())?;
    assert_eq!(nodes.len(), 1, "{:?} should build one node", source);
    Ok(nodes.remove(0))
}

proptest! {
    #[test]
    fn integers_in_range_stay_integers(value in 0..=i32::MAX) {
        match build_single(&value.to_string()).unwrap() {
            Node::Integer(literal) => prop_assert_eq!(literal.value, value),
            other => prop_assert!(false, "expected an integer for {}, got {:?}", value, other),
        }
    }

    #[test]
    fn integers_out_of_range_fail(value in (i32::MAX as i64 + 1)..=i64::MAX) {
        let err = build_single(&value.to_string()).unwrap_err();
        prop_assert!(err.contains("Invalid number literal"), "{}", err);
    }

    #[test]
    fn dotted_text_is_a_float(whole in 0u32..1_000_000, fraction in "[0-9]{0,6}") {
        let text = format!("{}.{}", whole, fraction);
        let expected: f64 = text.parse().unwrap();
        match build_single(&text).unwrap() {
            Node::Float(literal) => prop_assert_eq!(literal.value, expected),
            other => prop_assert!(false, "expected a float for {}, got {:?}", text, other),
        }
    }

    #[test]
    fn leading_dot_is_a_float(fraction in "[0-9]{1,6}") {
        let text = format!(".{}", fraction);
        let expected: f64 = text.parse().unwrap();
        match build_single(&text).unwrap() {
            Node::Float(literal) => prop_assert_eq!(literal.value, expected),
            other => prop_assert!(false, "expected a float for {}, got {:?}", text, other),
        }
    }

    #[test]
    fn hex_integers(value in 0..=i32::MAX) {
        let text = format!("0x{:X}", value);
        match build_single(&text).unwrap() {
            Node::Integer(literal) => prop_assert_eq!(literal.value, value),
            other => prop_assert!(false, "expected an integer for {}, got {:?}", text, other),
        }
    }
}
