//! AST builder
//!
//! Converts [ParseNode] trees into [Node]s in one bottom-up pass. Dispatch is a single
//! exhaustive `match` over [NodeKind]: every kind either maps to exactly one constructor
//! below, or is reported as [BuildError::UnsupportedConstruct] (structural kinds such as
//! `ARGS` or `CASE` only make sense inside their parent and are consumed there).
//!
//! The builder takes parse nodes by value, so children are moved into the AST rather than
//! copied. The only place a subtree is reshaped before building is the `new` rewrite, see
//! [new_rewrite](super::new_rewrite).

use super::error::BuildError;
use super::literals;
use super::new_rewrite::detach_new;
use crate::es3::ast::{
    ArrayLiteral, Assign, AssignmentBlock, Binary, BinaryOperator, Block, Break, Call, Catch,
    Continue, Delete, ForIn, ForStep, Function, Identifier, If, In, IndexAccess, InstanceOf,
    Logical, LogicalOperator, MemberAccess, New, Node, ObjectLiteral, Postfix, PostfixOperator,
    Property, Return, Span, StrictCompare, StrictOperator, Switch, SwitchCase, Throw, Try,
    TypeOf, Unary, UnaryOperator, UnsignedRightShift, Void, While, WhileStyle, With,
};
use crate::es3::config::BuildConfig;
use crate::es3::nesting::with_nesting_stack;
use crate::es3::parsing::{NodeKind, ParseNode};
use std::collections::HashMap;

/// Ordered access to a parse node's children, failing with [BuildError::MalformedNode] when a
/// required child is missing.
struct Children {
    kind: NodeKind,
    span: Span,
    iter: std::vec::IntoIter<ParseNode>,
}

impl Children {
    fn of(node: ParseNode) -> Self {
        Self {
            kind: node.kind,
            span: Span::from(&node.span),
            iter: node.children.into_iter(),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<ParseNode, BuildError> {
        self.iter.next().ok_or(BuildError::MalformedNode {
            kind: self.kind.name(),
            expected,
            span: self.span,
        })
    }

    fn next_opt(&mut self) -> Option<ParseNode> {
        self.iter.next()
    }

    fn rest(self) -> Vec<ParseNode> {
        self.iter.collect()
    }
}

/// Statement kinds that accept a label
fn is_labelable(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Block
            | NodeKind::If
            | NodeKind::Switch
            | NodeKind::While
            | NodeKind::Do
            | NodeKind::For
            | NodeKind::Try
            | NodeKind::With
    )
}

/// Grouping kinds that hand a label on to the node they wrap
fn is_transparent(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Expr | NodeKind::ParExpr)
}

fn binary_operator(kind: NodeKind) -> Option<BinaryOperator> {
    let operator = match kind {
        NodeKind::Add | NodeKind::AddAssign | NodeKind::Inc => BinaryOperator::Add,
        NodeKind::Sub | NodeKind::SubAssign | NodeKind::Dec => BinaryOperator::Subtract,
        NodeKind::Mul | NodeKind::MulAssign => BinaryOperator::Multiply,
        NodeKind::Div | NodeKind::DivAssign => BinaryOperator::Divide,
        NodeKind::Mod | NodeKind::ModAssign => BinaryOperator::Modulo,
        NodeKind::Eq => BinaryOperator::Equal,
        NodeKind::Neq => BinaryOperator::NotEqual,
        NodeKind::Lt => BinaryOperator::Less,
        NodeKind::Gt => BinaryOperator::Greater,
        NodeKind::Lte => BinaryOperator::LessOrEqual,
        NodeKind::Gte => BinaryOperator::GreaterOrEqual,
        NodeKind::Shl | NodeKind::ShlAssign => BinaryOperator::LeftShift,
        NodeKind::Shr | NodeKind::ShrAssign => BinaryOperator::RightShift,
        NodeKind::And | NodeKind::AndAssign => BinaryOperator::BitwiseAnd,
        NodeKind::Or | NodeKind::OrAssign => BinaryOperator::BitwiseOr,
        NodeKind::Xor | NodeKind::XorAssign => BinaryOperator::BitwiseXor,
        _ => return None,
    };
    Some(operator)
}

pub struct AstBuilder {
    max_depth: usize,
    depth: usize,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::with_config(&BuildConfig::default())
    }

    pub fn with_config(config: &BuildConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Build a whole source unit.
    ///
    /// An empty unit yields a single `Null` placeholder, a `NIL` root one node per child in
    /// source order, and any other root a single node. The build runs on a stack sized for
    /// the nesting limit, so trees nested past it fail with [BuildError::NestingTooDeep].
    pub fn build_program(&mut self, root: Option<ParseNode>) -> Result<Vec<Node>, BuildError> {
        let max_depth = self.max_depth;
        let nodes = with_nesting_stack(max_depth, || self.build_unit(root))?;
        log::debug!(target: "es3::build", "built {} top-level node(s)", nodes.len());
        Ok(nodes)
    }

    fn build_unit(&mut self, root: Option<ParseNode>) -> Result<Vec<Node>, BuildError> {
        match root {
            None => Ok(vec![Node::null(Span::default())]),
            Some(root) if root.is(NodeKind::Nil) => self.build_all(root.children),
            Some(root) => Ok(vec![self.build(root)?]),
        }
    }

    /// Build one parse node into exactly one AST node, recursing on the current stack.
    pub fn build(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        self.build_node(node, None)
    }

    /// Build with an optional label for the resulting statement.
    pub fn build_node(
        &mut self,
        node: ParseNode,
        label: Option<String>,
    ) -> Result<Node, BuildError> {
        self.depth += 1;
        let result = if self.depth > self.max_depth {
            Err(BuildError::NestingTooDeep {
                limit: self.max_depth,
                span: Span::from(&node.span),
            })
        } else {
            self.dispatch(node, label)
        };
        self.depth -= 1;
        result
    }

    /// One arm per kind, each delegating to a helper. The helpers stay out of line so this
    /// frame, which sits on the stack once per nesting level, stays small.
    fn dispatch(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        log::trace!(target: "es3::build", "{} at {:?}", node.kind, node.span);

        if let Some(label) = &label {
            if !is_labelable(node.kind)
                && !is_transparent(node.kind)
                && !node.is(NodeKind::Labelled)
            {
                return Err(BuildError::InvalidLabelTarget {
                    label: label.clone(),
                    kind: node.kind.name(),
                    span: Span::from(&node.span),
                });
            }
        }

        match node.kind {
            NodeKind::Expr | NodeKind::ParExpr => self.build_grouping(node, label),
            NodeKind::Labelled => self.build_labelled(node, label),
            NodeKind::Block => self.build_block(node, label).map(Node::Block),
            NodeKind::Var => self.build_var(node),
            NodeKind::CExpr => self.build_sequence(node),
            NodeKind::Object => self.build_object(node),
            NodeKind::Array => self.build_array(node),
            NodeKind::Function => self.build_function(node).map(Node::Function),
            NodeKind::Call => self.build_call(node),
            NodeKind::New => self.build_new(node),
            NodeKind::ByField | NodeKind::ByIndex => self.build_access(node),
            NodeKind::If | NodeKind::Que => self.build_conditional(node, label),
            NodeKind::Switch => self.build_switch(node, label),
            NodeKind::Try => self.build_try(node, label),
            NodeKind::While | NodeKind::Do => self.build_while(node, label),
            NodeKind::For => self.build_for(node, label),
            NodeKind::With => self.build_with(node, label),
            NodeKind::Return | NodeKind::Throw | NodeKind::Break | NodeKind::Continue => {
                self.build_jump(node)
            }
            NodeKind::This
            | NodeKind::Identifier
            | NodeKind::DecimalLiteral
            | NodeKind::HexIntegerLiteral
            | NodeKind::StringLiteral
            | NodeKind::RegularExpressionLiteral
            | NodeKind::Null
            | NodeKind::True
            | NodeKind::False => build_leaf(node),
            NodeKind::Assign
            | NodeKind::AddAssign
            | NodeKind::SubAssign
            | NodeKind::MulAssign
            | NodeKind::DivAssign
            | NodeKind::ModAssign
            | NodeKind::ShlAssign
            | NodeKind::ShrAssign
            | NodeKind::AndAssign
            | NodeKind::OrAssign
            | NodeKind::XorAssign
            | NodeKind::ShuAssign => self.build_assignment(node),
            NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::Mod
            | NodeKind::Eq
            | NodeKind::Neq
            | NodeKind::Lt
            | NodeKind::Gt
            | NodeKind::Lte
            | NodeKind::Gte
            | NodeKind::Shl
            | NodeKind::Shr
            | NodeKind::And
            | NodeKind::Or
            | NodeKind::Xor
            | NodeKind::Shu
            | NodeKind::LogicalAnd
            | NodeKind::LogicalOr
            | NodeKind::Same
            | NodeKind::NotSame
            | NodeKind::In
            | NodeKind::InstanceOf => self.build_binary(node),
            NodeKind::Inc | NodeKind::Dec | NodeKind::PostInc | NodeKind::PostDec => {
                self.build_step(node)
            }
            NodeKind::Inv
            | NodeKind::Not
            | NodeKind::Neg
            | NodeKind::Pos
            | NodeKind::TypeOf
            | NodeKind::Void
            | NodeKind::Delete => self.build_unary(node),
            NodeKind::Nil
            | NodeKind::NamedValue
            | NodeKind::Item
            | NodeKind::Args
            | NodeKind::Case
            | NodeKind::Default
            | NodeKind::Catch
            | NodeKind::Finally
            | NodeKind::ForStep
            | NodeKind::ForIter
            | NodeKind::Debugger => Err(BuildError::UnsupportedConstruct {
                kind: node.kind.name(),
                span: Span::from(&node.span),
            }),
        }
    }

    #[inline(never)]
    fn build_grouping(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        let inner = Children::of(node).next("expression")?;
        self.build_node(inner, label)
    }

    /// A statement carries one label. When labels are stacked (`a: b: while ...`) the
    /// innermost one is kept.
    #[inline(never)]
    fn build_labelled(
        &mut self,
        node: ParseNode,
        outer: Option<String>,
    ) -> Result<Node, BuildError> {
        let mut children = Children::of(node);
        let name = children.next("label")?;
        let target = children.next("statement")?;
        if let Some(outer) = outer {
            log::debug!(
                target: "es3::build",
                "dropping label '{}', statement is already labelled '{}'",
                outer,
                name.text
            );
        }
        self.build_node(target, Some(name.text))
    }

    #[inline(never)]
    fn build_sequence(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let nodes = self.build_all(node.children)?;
        Ok(Node::AssignmentBlock(AssignmentBlock {
            nodes,
            is_declaration: false,
            span,
        }))
    }

    #[inline(never)]
    fn build_new(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let operand = Children::of(node).next("operand")?;
        Ok(Node::New(New {
            callee: Box::new(self.build(operand)?),
            arguments: None,
            span,
        }))
    }

    /// `if` statements and `?:` conditionals
    #[inline(never)]
    fn build_conditional(
        &mut self,
        node: ParseNode,
        label: Option<String>,
    ) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let is_ternary = node.is(NodeKind::Que);
        let mut children = Children::of(node);
        let test = self.build(children.next("test")?)?;
        let consequent = self.build(children.next("consequent")?)?;
        let alternate = if is_ternary {
            Some(self.build(children.next("alternate")?)?)
        } else {
            children.next_opt().map(|n| self.build(n)).transpose()?
        };
        Ok(Node::If(If::new(
            test, consequent, alternate, is_ternary, label, span,
        )))
    }

    #[inline(never)]
    fn build_while(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let kind = node.kind;
        let (first, second) = self.build_pair(node)?;
        let (test, body, style) = match kind {
            NodeKind::Do => (second, first, WhileStyle::PostTest),
            _ => (first, second, WhileStyle::PreTest),
        };
        Ok(Node::While(While::new(test, body, style, label, span)))
    }

    #[inline(never)]
    fn build_with(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let (object, body) = self.build_pair(node)?;
        Ok(Node::With(With::new(object, body, label, span)))
    }

    /// `return`, `throw`, `break` and `continue`
    #[inline(never)]
    fn build_jump(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let kind = node.kind;
        let mut children = Children::of(node);
        match kind {
            NodeKind::Return => {
                let value = match children.next_opt() {
                    Some(value) => self.build(value)?,
                    None => Node::null(span),
                };
                Ok(Node::Return(Return {
                    value: Box::new(value),
                    span,
                }))
            }
            NodeKind::Throw => {
                let value = self.build(children.next("value")?)?;
                Ok(Node::Throw(Throw {
                    value: Box::new(value),
                    span,
                }))
            }
            NodeKind::Break => Ok(Node::Break(Break {
                label: children.next_opt().map(|target| target.text),
                span,
            })),
            _ => Ok(Node::Continue(Continue {
                label: children.next_opt().map(|target| target.text),
                span,
            })),
        }
    }

    /// `=` and the compound assignments. `t op= v` becomes `t = t op v`; the target is built
    /// once and cloned into the operation.
    #[inline(never)]
    fn build_assignment(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let kind = node.kind;
        let (target, value) = self.build_pair(node)?;

        let operation = match kind {
            NodeKind::Assign => value,
            NodeKind::ShuAssign => Node::UnsignedRightShift(UnsignedRightShift {
                left: Box::new(target.clone()),
                right: Box::new(value),
                span,
            }),
            _ => match binary_operator(kind) {
                Some(operator) => binary(operator, target.clone(), value, span),
                None => {
                    return Err(BuildError::UnsupportedConstruct {
                        kind: kind.name(),
                        span,
                    })
                }
            },
        };
        Ok(assign(target, operation, span))
    }

    /// Two-operand operators other than assignment
    #[inline(never)]
    fn build_binary(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let kind = node.kind;
        let (left, right) = self.build_pair(node)?;
        let (left, right) = (Box::new(left), Box::new(right));

        let built = match kind {
            NodeKind::Shu => Node::UnsignedRightShift(UnsignedRightShift { left, right, span }),
            NodeKind::LogicalAnd | NodeKind::LogicalOr => Node::Logical(Logical {
                operator: if kind == NodeKind::LogicalAnd {
                    LogicalOperator::And
                } else {
                    LogicalOperator::Or
                },
                left,
                right,
                span,
            }),
            NodeKind::Same | NodeKind::NotSame => Node::StrictCompare(StrictCompare {
                operator: if kind == NodeKind::Same {
                    StrictOperator::Same
                } else {
                    StrictOperator::NotSame
                },
                left,
                right,
                span,
            }),
            NodeKind::In => Node::In(In {
                property: left,
                object: right,
                span,
            }),
            NodeKind::InstanceOf => Node::InstanceOf(InstanceOf {
                value: left,
                constructor: right,
                span,
            }),
            _ => match binary_operator(kind) {
                Some(operator) => Node::Binary(Binary {
                    operator,
                    left,
                    right,
                    span,
                }),
                None => {
                    return Err(BuildError::UnsupportedConstruct {
                        kind: kind.name(),
                        span,
                    })
                }
            },
        };
        Ok(built)
    }

    /// Prefix `++x` becomes `x = x + 1`; postfix forms keep their own node.
    #[inline(never)]
    fn build_step(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let kind = node.kind;
        let target = self.build(Children::of(node).next("operand")?)?;

        match kind {
            NodeKind::PostInc | NodeKind::PostDec => Ok(Node::Postfix(Postfix {
                operator: if kind == NodeKind::PostInc {
                    PostfixOperator::Increment
                } else {
                    PostfixOperator::Decrement
                },
                target: Box::new(target),
                span,
            })),
            _ => {
                let operator = if kind == NodeKind::Inc {
                    BinaryOperator::Add
                } else {
                    BinaryOperator::Subtract
                };
                let step = binary(operator, target.clone(), Node::integer(1, span), span);
                Ok(assign(target, step, span))
            }
        }
    }

    #[inline(never)]
    fn build_unary(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let kind = node.kind;
        let operand = Box::new(self.build(Children::of(node).next("operand")?)?);

        let operator = match kind {
            NodeKind::TypeOf => return Ok(Node::TypeOf(TypeOf { operand, span })),
            NodeKind::Void => return Ok(Node::Void(Void { operand, span })),
            NodeKind::Delete => return Ok(Node::Delete(Delete { operand, span })),
            NodeKind::Inv => UnaryOperator::BitwiseNot,
            NodeKind::Not => UnaryOperator::Not,
            NodeKind::Neg => UnaryOperator::Negate,
            _ => UnaryOperator::Plus,
        };
        Ok(Node::Unary(Unary {
            operator,
            operand,
            span,
        }))
    }

    fn build_all(&mut self, nodes: Vec<ParseNode>) -> Result<Vec<Node>, BuildError> {
        nodes.into_iter().map(|node| self.build(node)).collect()
    }

    /// Build the two leading children of a binary-shaped node.
    fn build_pair(&mut self, node: ParseNode) -> Result<(Node, Node), BuildError> {
        let mut children = Children::of(node);
        let first = children.next("first operand")?;
        let second = children.next("second operand")?;
        Ok((self.build(first)?, self.build(second)?))
    }

    /// A `BLOCK` node as a [Block]; any other statement is wrapped in a one-statement block.
    #[inline(never)]
    fn build_block(&mut self, node: ParseNode, label: Option<String>) -> Result<Block, BuildError> {
        let span = Span::from(&node.span);
        if node.is(NodeKind::Block) {
            let statements = self.build_all(node.children)?;
            Ok(Block::new(statements, label, span))
        } else {
            let statement = self.build(node)?;
            Ok(Block::new(vec![statement], label, span))
        }
    }

    #[inline(never)]
    fn build_var(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut declarators = node
            .children
            .into_iter()
            .map(|declarator| self.build_declarator(declarator))
            .collect::<Result<Vec<_>, _>>()?;

        match declarators.len() {
            0 => Err(BuildError::MalformedNode {
                kind: NodeKind::Var.name(),
                expected: "declarator",
                span,
            }),
            1 => Ok(declarators.remove(0)),
            _ => Ok(Node::AssignmentBlock(AssignmentBlock {
                nodes: declarators,
                is_declaration: true,
                span,
            })),
        }
    }

    /// A `var` declarator: the declared name is built as a definition.
    fn build_declarator(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        match node.kind {
            NodeKind::Identifier => Ok(Node::Identifier(Identifier::definition(node.text, span))),
            NodeKind::Assign => {
                let mut children = Children::of(node);
                let target = children.next("target")?;
                let value = children.next("value")?;
                let target = if target.is(NodeKind::Identifier) {
                    Node::Identifier(Identifier::definition(
                        target.text,
                        Span::from(&target.span),
                    ))
                } else {
                    self.build(target)?
                };
                let value = self.build(value)?;
                Ok(assign(target, value, span))
            }
            _ => self.build(node),
        }
    }

    #[inline(never)]
    fn build_object(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut properties: Vec<Property> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for entry in node.children {
            if !entry.is(NodeKind::NamedValue) {
                return Err(BuildError::UnsupportedConstruct {
                    kind: entry.kind.name(),
                    span: Span::from(&entry.span),
                });
            }
            let mut children = Children::of(entry);
            let name = literals::property_name(&children.next("property name")?.text).to_string();
            let value = self.build(children.next("property value")?)?;

            match positions.get(&name) {
                Some(&position) => properties[position].value = value,
                None => {
                    positions.insert(name.clone(), properties.len());
                    properties.push(Property { name, value });
                }
            }
        }

        Ok(Node::Object(ObjectLiteral { properties, span }))
    }

    #[inline(never)]
    fn build_array(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut elements = Vec::with_capacity(node.children.len());
        for item in node.children {
            let element = if item.is(NodeKind::Item) {
                Children::of(item).next_opt()
            } else {
                Some(item)
            };
            elements.push(element.map(|element| self.build(element)).transpose()?);
        }
        Ok(Node::Array(ArrayLiteral { elements, span }))
    }

    /// Children: optional name, `ARGS` of parameter names, body.
    #[inline(never)]
    fn build_function(&mut self, node: ParseNode) -> Result<Function, BuildError> {
        let span = Span::from(&node.span);
        let named = node.child_count() > 2;
        let mut children = Children::of(node);
        let name = if named {
            Some(children.next("name")?.text)
        } else {
            None
        };
        let params = children
            .next("parameter list")?
            .children
            .into_iter()
            .map(|param| param.text)
            .collect();
        let body = self.build_block(children.next("body")?, None)?;

        Ok(Function {
            name,
            params,
            body,
            span,
        })
    }

    fn build_arguments(&mut self, node: ParseNode) -> Result<Vec<Node>, BuildError> {
        if node.is(NodeKind::Args) {
            self.build_all(node.children)
        } else {
            Ok(vec![self.build(node)?])
        }
    }

    /// A call, or a `new` with arguments when the callee chain starts at a `NEW`.
    #[inline(never)]
    fn build_call(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut children = Children::of(node);
        let callee = children.next("callee")?;
        let arguments = match children.next_opt() {
            Some(arguments) => self.build_arguments(arguments)?,
            None => Vec::new(),
        };

        let (callee, rewritten) = detach_new(callee);
        let callee = Box::new(self.build(callee)?);
        if rewritten {
            Ok(Node::New(New {
                callee,
                arguments: Some(arguments),
                span,
            }))
        } else {
            Ok(Node::Call(Call {
                callee,
                arguments,
                span,
            }))
        }
    }

    /// `BYFIELD`/`BYINDEX`. When the object chain starts at a `NEW`, the whole access becomes
    /// the constructed expression: `new a.b` is `new (a.b)`.
    #[inline(never)]
    fn build_access(&mut self, node: ParseNode) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let by_field = node.is(NodeKind::ByField);
        let mut children = Children::of(node);
        let object = children.next("object")?;
        let member = children.next("member")?;

        let (object, rewritten) = detach_new(object);
        let object = Box::new(self.build(object)?);
        let access = if by_field {
            Node::MemberAccess(MemberAccess {
                object,
                property: member.text,
                span,
            })
        } else {
            Node::IndexAccess(IndexAccess {
                object,
                index: Box::new(self.build(member)?),
                span,
            })
        };

        if rewritten {
            Ok(Node::New(New {
                callee: Box::new(access),
                arguments: None,
                span,
            }))
        } else {
            Ok(access)
        }
    }

    #[inline(never)]
    fn build_switch(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut children = Children::of(node);
        let discriminant = self.build(children.next("discriminant")?)?;

        let mut cases = Vec::new();
        let mut default: Option<Node> = None;
        for clause in children.rest() {
            let clause_span = Span::from(&clause.span);
            match clause.kind {
                NodeKind::Case => {
                    let mut parts = Children::of(clause);
                    let test = self.build(parts.next("case test")?)?;
                    let statements = self.build_all(parts.rest())?;
                    cases.push(SwitchCase {
                        test,
                        body: Block::new(statements, None, clause_span),
                        span: clause_span,
                    });
                }
                NodeKind::Default => {
                    if default.is_some() {
                        return Err(BuildError::MalformedNode {
                            kind: NodeKind::Switch.name(),
                            expected: "at most one default clause",
                            span: clause_span,
                        });
                    }
                    let statements = self.build_all(clause.children)?;
                    default = Some(Node::Block(Block::new(statements, None, clause_span)));
                }
                kind => {
                    return Err(BuildError::UnsupportedConstruct {
                        kind: kind.name(),
                        span: clause_span,
                    })
                }
            }
        }

        let default = default.unwrap_or_else(|| Node::null(span));
        Ok(Node::Switch(Switch::new(
            discriminant,
            cases,
            default,
            label,
            span,
        )))
    }

    #[inline(never)]
    fn build_try(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut children = Children::of(node);
        let body = self.build_block(children.next("protected block")?, None)?;

        let mut catch = None;
        let mut finally = None;
        for clause in children.rest() {
            let clause_span = Span::from(&clause.span);
            match clause.kind {
                NodeKind::Catch => {
                    let mut parts = Children::of(clause);
                    let binding = parts.next("catch binding")?.text;
                    let body = self.build_block(parts.next("catch block")?, None)?;
                    catch = Some(Catch {
                        binding,
                        body,
                        span: clause_span,
                    });
                }
                NodeKind::Finally => {
                    let block = Children::of(clause).next("finally block")?;
                    finally = Some(self.build_block(block, None)?);
                }
                kind => {
                    return Err(BuildError::UnsupportedConstruct {
                        kind: kind.name(),
                        span: clause_span,
                    })
                }
            }
        }

        Ok(Node::Try(Try::new(body, catch, finally, label, span)))
    }

    #[inline(never)]
    fn build_for(&mut self, node: ParseNode, label: Option<String>) -> Result<Node, BuildError> {
        let span = Span::from(&node.span);
        let mut children = Children::of(node);
        let head = children.next("loop head")?;
        let body = children.next("loop body")?;

        match head.kind {
            NodeKind::ForStep => {
                let mut clauses = Children::of(head);
                let init = self.build_clause(clauses.next("init clause")?, Node::null)?;
                let test = self.build_clause(clauses.next("test clause")?, |at| {
                    Node::boolean(true, at)
                })?;
                let increment =
                    self.build_clause(clauses.next("increment clause")?, Node::null)?;
                let body = self.build(body)?;
                Ok(Node::ForStep(ForStep::new(
                    init, test, increment, body, label, span,
                )))
            }
            NodeKind::ForIter => {
                let mut clauses = Children::of(head);
                let target = self.build_clause(clauses.next("target")?, Node::null)?;
                let object = self.build_clause(clauses.next("object")?, Node::null)?;
                let body = self.build(body)?;
                Ok(Node::ForIn(ForIn::new(target, object, body, label, span)))
            }
            kind => Err(BuildError::UnsupportedConstruct {
                kind: kind.name(),
                span: Span::from(&head.span),
            }),
        }
    }

    /// One `EXPR` clause of a loop head; an empty clause yields `default`.
    fn build_clause(
        &mut self,
        clause: ParseNode,
        default: impl FnOnce(Span) -> Node,
    ) -> Result<Node, BuildError> {
        if !clause.is(NodeKind::Expr) {
            return self.build(clause);
        }
        let at = Span::from(&clause.span);
        match Children::of(clause).next_opt() {
            Some(expression) => self.build(expression),
            None => Ok(default(at)),
        }
    }

}

fn assign(target: Node, value: Node, span: Span) -> Node {
    Node::Assign(Assign {
        target: Box::new(target),
        value: Box::new(value),
        span,
    })
}

/// Names, `this` and literals
fn build_leaf(node: ParseNode) -> Result<Node, BuildError> {
    let span = Span::from(&node.span);
    match node.kind {
        NodeKind::This => Ok(Node::Identifier(Identifier::new("this", span))),
        NodeKind::DecimalLiteral => literals::parse_number(&node.text, span),
        NodeKind::HexIntegerLiteral => literals::parse_hex(&node.text, span),
        NodeKind::StringLiteral => literals::parse_string(&node.text, span),
        NodeKind::RegularExpressionLiteral => literals::parse_regex(&node.text, span),
        NodeKind::Null => Ok(Node::null(span)),
        NodeKind::True => Ok(Node::boolean(true, span)),
        NodeKind::False => Ok(Node::boolean(false, span)),
        _ => Ok(Node::Identifier(Identifier::new(node.text, span))),
    }
}

fn binary(operator: BinaryOperator, left: Node, right: Node, span: Span) -> Node {
    Node::Binary(Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es3::parsing::DEFAULT_MAX_DEPTH;

    fn leaf(kind: NodeKind, text: &str) -> ParseNode {
        ParseNode::leaf(kind, text, 0..text.len())
    }

    fn build(node: ParseNode) -> Result<Node, BuildError> {
        AstBuilder::new().build(node)
    }

    #[test]
    fn test_empty_unit_is_null_placeholder() {
        let nodes = AstBuilder::new().build_program(None).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_null());
    }

    #[test]
    fn test_nil_root_explodes() {
        let root = ParseNode::imaginary(
            NodeKind::Nil,
            0..3,
            vec![leaf(NodeKind::Identifier, "a"), leaf(NodeKind::True, "true")],
        );
        let nodes = AstBuilder::new().build_program(Some(root)).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind_name(), "Identifier");
        assert_eq!(nodes[1].kind_name(), "Boolean");
    }

    #[test]
    fn test_structural_kinds_are_unsupported() {
        for kind in [NodeKind::Args, NodeKind::Debugger, NodeKind::Case, NodeKind::Nil] {
            let err = build(ParseNode::imaginary(kind, 0..0, vec![])).unwrap_err();
            assert_eq!(
                err,
                BuildError::UnsupportedConstruct {
                    kind: kind.name(),
                    span: Span::new(0, 0),
                }
            );
        }
    }

    #[test]
    fn test_missing_children_are_malformed() {
        let err = build(ParseNode::imaginary(NodeKind::Add, 0..0, vec![])).unwrap_err();
        assert!(matches!(
            err,
            BuildError::MalformedNode { kind: "ADD", .. }
        ));
    }

    #[test]
    fn test_label_on_expression_is_rejected() {
        let labelled = ParseNode::imaginary(
            NodeKind::Labelled,
            0..0,
            vec![
                leaf(NodeKind::Identifier, "l"),
                ParseNode::imaginary(NodeKind::Expr, 0..0, vec![leaf(NodeKind::Identifier, "x")]),
            ],
        );
        let err = build(labelled).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidLabelTarget { ref label, kind: "Identifier", .. } if label == "l"
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let mut node = leaf(NodeKind::Identifier, "x");
        for _ in 0..10 {
            node = ParseNode::imaginary(NodeKind::Not, 0..0, vec![node]);
        }
        let err = AstBuilder::with_config(&BuildConfig::with_max_depth(5))
            .build(node)
            .unwrap_err();
        assert!(matches!(err, BuildError::NestingTooDeep { limit: 5, .. }));
    }

    #[test]
    fn test_builder_is_reusable_after_error() {
        let mut builder = AstBuilder::with_config(&BuildConfig::with_max_depth(3));
        let mut deep = leaf(NodeKind::Identifier, "x");
        for _ in 0..5 {
            deep = ParseNode::imaginary(NodeKind::Not, 0..0, vec![deep]);
        }
        assert!(builder.build(deep).is_err());
        assert!(builder.build(leaf(NodeKind::Identifier, "y")).is_ok());
    }

    fn nested_arrays(levels: usize) -> ParseNode {
        let mut node = leaf(NodeKind::DecimalLiteral, "1");
        for _ in 0..levels {
            node = ParseNode::imaginary(NodeKind::Array, 0..0, vec![node]);
        }
        node
    }

    #[test]
    fn test_program_at_default_depth_limit() {
        let nodes = AstBuilder::new()
            .build_program(Some(nested_arrays(DEFAULT_MAX_DEPTH - 1)))
            .unwrap();
        assert_eq!(nodes[0].kind_name(), "Array");
    }

    #[test]
    fn test_program_past_default_depth_limit() {
        let err = AstBuilder::new()
            .build_program(Some(nested_arrays(DEFAULT_MAX_DEPTH)))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn test_stacked_labels_keep_the_innermost() {
        let stacked = ParseNode::imaginary(
            NodeKind::Labelled,
            0..0,
            vec![
                leaf(NodeKind::Identifier, "a"),
                ParseNode::imaginary(
                    NodeKind::Labelled,
                    0..0,
                    vec![
                        leaf(NodeKind::Identifier, "b"),
                        ParseNode::imaginary(NodeKind::Block, 0..0, vec![]),
                    ],
                ),
            ],
        );
        let node = build(stacked).unwrap();
        assert_eq!(node.kind_name(), "Block");
        assert_eq!(node.label(), Some("b"));
    }
}
