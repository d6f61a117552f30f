//! S-expression formatter for AST nodes
//!
//! Every node renders as a single token or a parenthesized form headed by an operator or
//! keyword, children in field order:
//!
//! ```text
//! var a = 1, b;     (decl (= (def a) 1) (def b))
//! new a.b           (new (. a b))
//! new a.b(c)        (new (. a b) (c))
//! x += 2            (= x (+ x 2))
//! outer: while (t); (while@outer t (block))
//! ```
//!
//! Conventions:
//!     Identifiers: bare name, `(def name)` for definitions
//!     Numbers: integers as written, floats always with a fraction (`1.0`)
//!     Strings: contents between the original quotes
//!     Array holes: `_`
//!     Labels: `@label` appended to the statement's head
//!     `new`: `(new callee)` without an argument list, `(new callee (args...))` with one

use crate::es3::ast::{Block, Node, WhileStyle};

/// Render one node
pub fn to_sexp(node: &Node) -> String {
    match node {
        Node::Identifier(n) if n.is_definition() => form("def", None, vec![n.name.clone()]),
        Node::Identifier(n) => n.name.clone(),
        Node::Integer(n) => n.value.to_string(),
        Node::Float(n) => format!("{:?}", n.value),
        Node::String(n) => format!("{}{}{}", n.quote, n.value, n.quote),
        Node::Boolean(n) => n.value.to_string(),
        Node::Null(_) => "null".to_string(),
        Node::Regex(n) => format!("/{}/{}", n.pattern, n.flags),
        Node::Array(n) => form(
            "array",
            None,
            n.elements
                .iter()
                .map(|element| element.as_ref().map_or_else(|| "_".to_string(), to_sexp))
                .collect(),
        ),
        Node::Object(n) => form(
            "object",
            None,
            n.properties
                .iter()
                .map(|property| format!("({} {})", property.name, to_sexp(&property.value)))
                .collect(),
        ),
        Node::Function(n) => form(
            "function",
            None,
            vec![
                n.name.clone().unwrap_or_else(|| "_".to_string()),
                format!("({})", n.params.join(" ")),
                block(&n.body),
            ],
        ),
        Node::Call(n) => {
            let mut parts = vec![to_sexp(&n.callee)];
            parts.extend(n.arguments.iter().map(to_sexp));
            form("call", None, parts)
        }
        Node::New(n) => {
            let mut parts = vec![to_sexp(&n.callee)];
            if let Some(arguments) = &n.arguments {
                parts.push(format!("({})", join(arguments)));
            }
            form("new", None, parts)
        }
        Node::MemberAccess(n) => form(".", None, vec![to_sexp(&n.object), n.property.clone()]),
        Node::IndexAccess(n) => form("[]", None, vec![to_sexp(&n.object), to_sexp(&n.index)]),
        Node::Assign(n) => form("=", None, vec![to_sexp(&n.target), to_sexp(&n.value)]),
        Node::AssignmentBlock(n) => {
            let head = if n.is_declaration { "decl" } else { "seq" };
            form(head, None, n.nodes.iter().map(to_sexp).collect())
        }
        Node::Binary(n) => form(
            n.operator.symbol(),
            None,
            vec![to_sexp(&n.left), to_sexp(&n.right)],
        ),
        Node::UnsignedRightShift(n) => {
            form(">>>", None, vec![to_sexp(&n.left), to_sexp(&n.right)])
        }
        Node::Unary(n) => form(n.operator.symbol(), None, vec![to_sexp(&n.operand)]),
        Node::Logical(n) => form(
            n.operator.symbol(),
            None,
            vec![to_sexp(&n.left), to_sexp(&n.right)],
        ),
        Node::StrictCompare(n) => form(
            n.operator.symbol(),
            None,
            vec![to_sexp(&n.left), to_sexp(&n.right)],
        ),
        Node::InstanceOf(n) => form(
            "instanceof",
            None,
            vec![to_sexp(&n.value), to_sexp(&n.constructor)],
        ),
        Node::In(n) => form("in", None, vec![to_sexp(&n.property), to_sexp(&n.object)]),
        Node::TypeOf(n) => form("typeof", None, vec![to_sexp(&n.operand)]),
        Node::Void(n) => form("void", None, vec![to_sexp(&n.operand)]),
        Node::Delete(n) => form("delete", None, vec![to_sexp(&n.operand)]),
        Node::Postfix(n) => form(
            &format!("post{}", n.operator.symbol()),
            None,
            vec![to_sexp(&n.target)],
        ),
        Node::Return(n) => form("return", None, vec![to_sexp(&n.value)]),
        Node::If(n) => {
            let mut parts = vec![to_sexp(&n.test), to_sexp(&n.consequent)];
            if let Some(alternate) = &n.alternate {
                parts.push(to_sexp(alternate));
            }
            let head = if n.is_ternary { "?" } else { "if" };
            form(head, n.label(), parts)
        }
        Node::Switch(n) => {
            let mut parts = vec![to_sexp(&n.discriminant)];
            parts.extend(
                n.cases
                    .iter()
                    .map(|case| form("case", None, vec![to_sexp(&case.test), block(&case.body)])),
            );
            parts.push(form("default", None, vec![to_sexp(&n.default)]));
            form("switch", n.label(), parts)
        }
        Node::While(n) => {
            let head = match n.style {
                WhileStyle::PreTest => "while",
                WhileStyle::PostTest => "do-while",
            };
            form(head, n.label(), vec![to_sexp(&n.test), to_sexp(&n.body)])
        }
        Node::ForStep(n) => form(
            "for",
            n.label(),
            vec![
                to_sexp(&n.init),
                to_sexp(&n.test),
                to_sexp(&n.increment),
                to_sexp(&n.body),
            ],
        ),
        Node::ForIn(n) => form(
            "for-in",
            n.label(),
            vec![to_sexp(&n.target), to_sexp(&n.object), to_sexp(&n.body)],
        ),
        Node::Break(n) => form("break", None, n.label.iter().cloned().collect()),
        Node::Continue(n) => form("continue", None, n.label.iter().cloned().collect()),
        Node::Try(n) => {
            let mut parts = vec![block(&n.body)];
            if let Some(catch) = &n.catch {
                parts.push(form("catch", None, vec![catch.binding.clone(), block(&catch.body)]));
            }
            if let Some(finally) = &n.finally {
                parts.push(form("finally", None, vec![block(finally)]));
            }
            form("try", n.label(), parts)
        }
        Node::Block(n) => block(n),
        Node::With(n) => form(
            "with",
            n.label(),
            vec![to_sexp(&n.object), to_sexp(&n.body)],
        ),
        Node::Throw(n) => form("throw", None, vec![to_sexp(&n.value)]),
    }
}

/// Render the top-level nodes of a program, separated by spaces
pub fn to_sexp_program(nodes: &[Node]) -> String {
    join(nodes)
}

fn block(block: &Block) -> String {
    form("block", block.label(), block.statements.iter().map(to_sexp).collect())
}

fn join(nodes: &[Node]) -> String {
    nodes.iter().map(to_sexp).collect::<Vec<_>>().join(" ")
}

fn form(head: &str, label: Option<&str>, parts: Vec<String>) -> String {
    let mut out = String::from("(");
    out.push_str(head);
    if let Some(label) = label {
        out.push('@');
        out.push_str(label);
    }
    for part in parts {
        out.push(' ');
        out.push_str(&part);
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es3::ast::Span;

    #[test]
    fn test_leaves() {
        let span = Span::default();
        assert_eq!(to_sexp(&Node::integer(42, span)), "42");
        assert_eq!(to_sexp(&Node::null(span)), "null");
        assert_eq!(to_sexp(&Node::boolean(false, span)), "false");
    }

    #[test]
    fn test_form_with_label() {
        assert_eq!(form("block", Some("l"), vec![]), "(block@l)");
        assert_eq!(
            form("+", None, vec!["a".into(), "b".into()]),
            "(+ a b)"
        );
    }

    #[test]
    fn test_program_joins_with_spaces() {
        let span = Span::default();
        let nodes = vec![Node::integer(1, span), Node::integer(2, span)];
        assert_eq!(to_sexp_program(&nodes), "1 2");
    }
}
