//! AST node model
//!
//! [Node] is a closed tagged union: one variant per construct the builder produces. Each
//! variant wraps a struct so that the constructs can also be used (and matched) on their own,
//! e.g. a [Function] body is always a [Block].
//!
//! Children are owned (`Box`/`Vec`), so a tree is acyclic by construction. Every node carries
//! the [Span] of the parse-tree node it was built from.
//!
//! Two attributes are decided once, at construction time, and cannot be changed afterwards:
//!
//! - whether an [Identifier] introduces a binding, see [Identifier::definition]
//! - the label of a statement, for the kinds that accept one (see [Node::label])
//!
//! Both live in private fields with read-only accessors.

use super::range::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Null(NullLiteral),
    Regex(RegexLiteral),
    Array(ArrayLiteral),
    Object(ObjectLiteral),
    Function(Function),
    Call(Call),
    New(New),
    MemberAccess(MemberAccess),
    IndexAccess(IndexAccess),
    Assign(Assign),
    AssignmentBlock(AssignmentBlock),
    Binary(Binary),
    UnsignedRightShift(UnsignedRightShift),
    Unary(Unary),
    Logical(Logical),
    StrictCompare(StrictCompare),
    InstanceOf(InstanceOf),
    In(In),
    TypeOf(TypeOf),
    Void(Void),
    Delete(Delete),
    Postfix(Postfix),
    Return(Return),
    If(If),
    Switch(Switch),
    While(While),
    ForStep(ForStep),
    ForIn(ForIn),
    Break(Break),
    Continue(Continue),
    Try(Try),
    Block(Block),
    With(With),
    Throw(Throw),
}

impl Node {
    /// The variant name, e.g. `"MemberAccess"`
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Identifier(_) => "Identifier",
            Node::Integer(_) => "Integer",
            Node::Float(_) => "Float",
            Node::String(_) => "String",
            Node::Boolean(_) => "Boolean",
            Node::Null(_) => "Null",
            Node::Regex(_) => "Regex",
            Node::Array(_) => "Array",
            Node::Object(_) => "Object",
            Node::Function(_) => "Function",
            Node::Call(_) => "Call",
            Node::New(_) => "New",
            Node::MemberAccess(_) => "MemberAccess",
            Node::IndexAccess(_) => "IndexAccess",
            Node::Assign(_) => "Assign",
            Node::AssignmentBlock(_) => "AssignmentBlock",
            Node::Binary(_) => "Binary",
            Node::UnsignedRightShift(_) => "UnsignedRightShift",
            Node::Unary(_) => "Unary",
            Node::Logical(_) => "Logical",
            Node::StrictCompare(_) => "StrictCompare",
            Node::InstanceOf(_) => "InstanceOf",
            Node::In(_) => "In",
            Node::TypeOf(_) => "TypeOf",
            Node::Void(_) => "Void",
            Node::Delete(_) => "Delete",
            Node::Postfix(_) => "Postfix",
            Node::Return(_) => "Return",
            Node::If(_) => "If",
            Node::Switch(_) => "Switch",
            Node::While(_) => "While",
            Node::ForStep(_) => "ForStep",
            Node::ForIn(_) => "ForIn",
            Node::Break(_) => "Break",
            Node::Continue(_) => "Continue",
            Node::Try(_) => "Try",
            Node::Block(_) => "Block",
            Node::With(_) => "With",
            Node::Throw(_) => "Throw",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Identifier(n) => n.span,
            Node::Integer(n) => n.span,
            Node::Float(n) => n.span,
            Node::String(n) => n.span,
            Node::Boolean(n) => n.span,
            Node::Null(n) => n.span,
            Node::Regex(n) => n.span,
            Node::Array(n) => n.span,
            Node::Object(n) => n.span,
            Node::Function(n) => n.span,
            Node::Call(n) => n.span,
            Node::New(n) => n.span,
            Node::MemberAccess(n) => n.span,
            Node::IndexAccess(n) => n.span,
            Node::Assign(n) => n.span,
            Node::AssignmentBlock(n) => n.span,
            Node::Binary(n) => n.span,
            Node::UnsignedRightShift(n) => n.span,
            Node::Unary(n) => n.span,
            Node::Logical(n) => n.span,
            Node::StrictCompare(n) => n.span,
            Node::InstanceOf(n) => n.span,
            Node::In(n) => n.span,
            Node::TypeOf(n) => n.span,
            Node::Void(n) => n.span,
            Node::Delete(n) => n.span,
            Node::Postfix(n) => n.span,
            Node::Return(n) => n.span,
            Node::If(n) => n.span,
            Node::Switch(n) => n.span,
            Node::While(n) => n.span,
            Node::ForStep(n) => n.span,
            Node::ForIn(n) => n.span,
            Node::Break(n) => n.span,
            Node::Continue(n) => n.span,
            Node::Try(n) => n.span,
            Node::Block(n) => n.span,
            Node::With(n) => n.span,
            Node::Throw(n) => n.span,
        }
    }

    /// Label attached to a labelable statement; `None` for every other kind.
    pub fn label(&self) -> Option<&str> {
        match self {
            Node::Block(n) => n.label(),
            Node::If(n) => n.label(),
            Node::Switch(n) => n.label(),
            Node::While(n) => n.label(),
            Node::ForStep(n) => n.label(),
            Node::ForIn(n) => n.label(),
            Node::Try(n) => n.label(),
            Node::With(n) => n.label(),
            _ => None,
        }
    }

    pub fn null(span: Span) -> Node {
        Node::Null(NullLiteral { span })
    }

    pub fn boolean(value: bool, span: Span) -> Node {
        Node::Boolean(BooleanLiteral { value, span })
    }

    pub fn integer(value: i32, span: Span) -> Node {
        Node::Integer(IntegerLiteral { value, span })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null(_))
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Node::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }
}

// -------------------------------------------------------------------------------------------
// Names and literals
// -------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    is_definition: bool,
    pub span: Span,
}

impl Identifier {
    /// A use of a name
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            is_definition: false,
            span,
        }
    }

    /// An occurrence that introduces a binding (`var` targets)
    pub fn definition(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            is_definition: true,
            span,
        }
    }

    pub fn is_definition(&self) -> bool {
        self.is_definition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegerLiteral {
    pub value: i32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatLiteral {
    pub value: f64,
    pub span: Span,
}

/// String contents without the surrounding quotes; escape sequences are kept as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub value: String,
    pub quote: char,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullLiteral {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegexLiteral {
    pub pattern: String,
    pub flags: String,
    pub span: Span,
}

/// `None` elements are holes, as in `[1, , 2]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Option<Node>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Node,
}

/// Properties in source order, names unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectLiteral {
    pub properties: Vec<Property>,
    pub span: Span,
}

impl ObjectLiteral {
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Block,
    pub span: Span,
}

// -------------------------------------------------------------------------------------------
// Calls and member access
// -------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
    pub span: Span,
}

/// `arguments` is `None` for `new C` without a parenthesized argument list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct New {
    pub callee: Box<Node>,
    pub arguments: Option<Vec<Node>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAccess {
    pub object: Box<Node>,
    pub property: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexAccess {
    pub object: Box<Node>,
    pub index: Box<Node>,
    pub span: Span,
}

// -------------------------------------------------------------------------------------------
// Assignment and operators
// -------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub target: Box<Node>,
    pub value: Box<Node>,
    pub span: Span,
}

/// A sequence evaluated left to right: a `var` statement with several declarators
/// (`is_declaration`) or a comma expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentBlock {
    pub nodes: Vec<Node>,
    pub is_declaration: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    LeftShift,
    RightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary {
    pub operator: BinaryOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: Span,
}

/// `>>>`, kept apart from [Binary] because it is the only unsigned operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsignedRightShift {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    BitwiseNot,
    Not,
    Negate,
    Plus,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Logical {
    pub operator: LogicalOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StrictOperator {
    Same,
    NotSame,
}

impl StrictOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            StrictOperator::Same => "===",
            StrictOperator::NotSame => "!==",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrictCompare {
    pub operator: StrictOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceOf {
    pub value: Box<Node>,
    pub constructor: Box<Node>,
    pub span: Span,
}

/// `property in object`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct In {
    pub property: Box<Node>,
    pub object: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeOf {
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Void {
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delete {
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

impl PostfixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOperator::Increment => "++",
            PostfixOperator::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Postfix {
    pub operator: PostfixOperator,
    pub target: Box<Node>,
    pub span: Span,
}

// -------------------------------------------------------------------------------------------
// Statements
// -------------------------------------------------------------------------------------------

/// `return;` carries a [Node::Null] value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub value: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Node>,
    label: Option<String>,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Node>, label: Option<String>, span: Span) -> Self {
        Self {
            statements,
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// `if` statements and `?:` conditionals (`is_ternary`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If {
    pub test: Box<Node>,
    pub consequent: Box<Node>,
    pub alternate: Option<Box<Node>>,
    pub is_ternary: bool,
    label: Option<String>,
    pub span: Span,
}

impl If {
    pub fn new(
        test: Node,
        consequent: Node,
        alternate: Option<Node>,
        is_ternary: bool,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
            is_ternary,
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    pub test: Node,
    pub body: Block,
    pub span: Span,
}

/// `default` is the default clause's [Block], or a [Node::Null] when the source has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Switch {
    pub discriminant: Box<Node>,
    pub cases: Vec<SwitchCase>,
    pub default: Box<Node>,
    label: Option<String>,
    pub span: Span,
}

impl Switch {
    pub fn new(
        discriminant: Node,
        cases: Vec<SwitchCase>,
        default: Node,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            discriminant: Box::new(discriminant),
            cases,
            default: Box::new(default),
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_null()
    }
}

/// Whether the loop test runs before (`while`) or after (`do ... while`) the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WhileStyle {
    PreTest,
    PostTest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While {
    pub test: Box<Node>,
    pub body: Box<Node>,
    pub style: WhileStyle,
    label: Option<String>,
    pub span: Span,
}

impl While {
    pub fn new(
        test: Node,
        body: Node,
        style: WhileStyle,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            test: Box::new(test),
            body: Box::new(body),
            style,
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Counting `for` loop. Empty clauses are filled in: `Null` for `init` and `increment`,
/// `true` for `test`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStep {
    pub init: Box<Node>,
    pub test: Box<Node>,
    pub increment: Box<Node>,
    pub body: Box<Node>,
    label: Option<String>,
    pub span: Span,
}

impl ForStep {
    pub fn new(
        init: Node,
        test: Node,
        increment: Node,
        body: Node,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            init: Box::new(init),
            test: Box::new(test),
            increment: Box::new(increment),
            body: Box::new(body),
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// `for (target in object) body`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForIn {
    pub target: Box<Node>,
    pub object: Box<Node>,
    pub body: Box<Node>,
    label: Option<String>,
    pub span: Span,
}

impl ForIn {
    pub fn new(
        target: Node,
        object: Node,
        body: Node,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            target: Box::new(target),
            object: Box::new(object),
            body: Box::new(body),
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Break {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Continue {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catch {
    pub binding: String,
    pub body: Block,
    pub span: Span,
}

/// At least one of `catch` and `finally` is present when built from source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Try {
    pub body: Block,
    pub catch: Option<Catch>,
    pub finally: Option<Block>,
    label: Option<String>,
    pub span: Span,
}

impl Try {
    pub fn new(
        body: Block,
        catch: Option<Catch>,
        finally: Option<Block>,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            body,
            catch,
            finally,
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct With {
    pub object: Box<Node>,
    pub body: Box<Node>,
    label: Option<String>,
    pub span: Span,
}

impl With {
    pub fn new(object: Node, body: Node, label: Option<String>, span: Span) -> Self {
        Self {
            object: Box::new(object),
            body: Box::new(body),
            label,
            span,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Throw {
    pub value: Box<Node>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_flag_is_fixed_at_construction() {
        let span = Span::new(0, 1);
        assert!(!Identifier::new("a", span).is_definition());
        assert!(Identifier::definition("a", span).is_definition());
    }

    #[test]
    fn test_label_only_on_labelable_kinds() {
        let span = Span::new(0, 2);
        let block = Node::Block(Block::new(vec![], Some("outer".into()), span));
        assert_eq!(block.label(), Some("outer"));

        let ident = Node::Identifier(Identifier::new("x", span));
        assert_eq!(ident.label(), None);
    }

    #[test]
    fn test_switch_default_marker() {
        let span = Span::default();
        let switch = Switch::new(
            Node::integer(1, span),
            vec![],
            Node::null(span),
            None,
            span,
        );
        assert!(!switch.has_default());
    }

    #[test]
    fn test_kind_name_and_span() {
        let node = Node::boolean(true, Span::new(4, 8));
        assert_eq!(node.kind_name(), "Boolean");
        assert_eq!(node.span(), Span::new(4, 8));
    }

    #[test]
    fn test_object_lookup() {
        let span = Span::default();
        let object = ObjectLiteral {
            properties: vec![Property {
                name: "a".into(),
                value: Node::integer(1, span),
            }],
            span,
        };
        assert_eq!(object.get("a"), Some(&Node::integer(1, span)));
        assert_eq!(object.get("b"), None);
    }
}
