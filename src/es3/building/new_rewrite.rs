//! `new` expression rewrite
//!
//! The parse tree binds `new` to a primary expression only, so `new a.b.c(x)` arrives as
//!
//! ```text
//! CALL
//! ├── BYFIELD
//! │   ├── BYFIELD
//! │   │   ├── NEW
//! │   │   │   └── a
//! │   │   └── b
//! │   └── c
//! └── ARGS (x)
//! ```
//!
//! while the program means "construct `a.b.c` with `(x)`". Before building a call, member or
//! index node, the builder hands its base to [detach_new]. The walk follows the base's left
//! spine through `BYFIELD`/`BYINDEX` nodes only. When it lands on a `NEW`, the `NEW` is replaced
//! by its operand and the caller builds a `New` node around the whole rebuilt chain. A `CALL`,
//! a `PAREXPR` or anything else ends the walk without a rewrite, which is what keeps
//! `new a.b().c` as `(new a.b()).c` and `(new a).b()` as a plain call.

use crate::es3::parsing::{NodeKind, ParseNode};

/// Remove a `NEW` found on the left spine of `base`.
///
/// Returns the (possibly rebuilt) subtree and whether a `NEW` was removed. Pure: the input is
/// consumed and an equivalent or rewritten tree comes back.
pub fn detach_new(base: ParseNode) -> (ParseNode, bool) {
    // Accessors whose base child has been taken out, outermost first
    let mut spine: Vec<ParseNode> = Vec::new();
    let mut current = base;

    while is_spine_node(&current) {
        let inner = current.children.remove(0);
        spine.push(current);
        current = inner;
    }

    let rewritten = current.is(NodeKind::New) && !current.children.is_empty();
    if rewritten {
        log::debug!(
            target: "es3::rewrite",
            "moving new at {:?} over {} accessor(s)",
            current.span,
            spine.len()
        );
        current = current.children.swap_remove(0);
    }

    while let Some(mut accessor) = spine.pop() {
        accessor.children.insert(0, current);
        current = accessor;
    }

    (current, rewritten)
}

fn is_spine_node(node: &ParseNode) -> bool {
    matches!(node.kind, NodeKind::ByField | NodeKind::ByIndex) && !node.children.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> ParseNode {
        ParseNode::leaf(NodeKind::Identifier, name, 0..0)
    }

    fn field(object: ParseNode, name: &str) -> ParseNode {
        ParseNode::imaginary(NodeKind::ByField, 0..0, vec![object, ident(name)])
    }

    fn new(operand: ParseNode) -> ParseNode {
        ParseNode::new(NodeKind::New, "new", 0..0, vec![operand])
    }

    fn call(callee: ParseNode) -> ParseNode {
        ParseNode::imaginary(
            NodeKind::Call,
            0..0,
            vec![callee, ParseNode::imaginary(NodeKind::Args, 0..0, vec![])],
        )
    }

    #[test]
    fn test_new_at_base_is_removed() {
        let (rebuilt, rewritten) = detach_new(new(ident("a")));
        assert!(rewritten);
        assert_eq!(rebuilt, ident("a"));
    }

    #[test]
    fn test_walks_member_spine() {
        let base = field(field(new(ident("a")), "b"), "c");
        let (rebuilt, rewritten) = detach_new(base);
        assert!(rewritten);
        assert_eq!(rebuilt, field(field(ident("a"), "b"), "c"));
    }

    #[test]
    fn test_walks_index_spine() {
        let index = ParseNode::imaginary(
            NodeKind::ByIndex,
            0..0,
            vec![new(ident("a")), ParseNode::leaf(NodeKind::DecimalLiteral, "0", 0..0)],
        );
        let (rebuilt, rewritten) = detach_new(index);
        assert!(rewritten);
        assert!(rebuilt.is(NodeKind::ByIndex));
        assert_eq!(rebuilt.children[0], ident("a"));
    }

    #[test]
    fn test_call_stops_walk() {
        let base = field(call(field(new(ident("a")), "b")), "c");
        let (rebuilt, rewritten) = detach_new(base.clone());
        assert!(!rewritten);
        assert_eq!(rebuilt, base);
    }

    #[test]
    fn test_parenthesized_new_stops_walk() {
        let paren = ParseNode::imaginary(NodeKind::ParExpr, 0..0, vec![new(ident("a"))]);
        let base = field(paren, "b");
        let (rebuilt, rewritten) = detach_new(base.clone());
        assert!(!rewritten);
        assert_eq!(rebuilt, base);
    }

    #[test]
    fn test_operand_subtree_kept_whole() {
        let operand = ParseNode::imaginary(
            NodeKind::ParExpr,
            0..0,
            vec![field(ident("x"), "y")],
        );
        let (rebuilt, rewritten) = detach_new(field(new(operand.clone()), "z"));
        assert!(rewritten);
        assert_eq!(rebuilt.children[0], operand);
    }
}
