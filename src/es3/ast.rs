//! AST definitions for ES3 programs
//!
//!     This module provides the typed Abstract Syntax Tree the builder produces, along with
//!     source location utilities.
//!
//! Nodes
//!
//!     A program is an ordered list of top-level [Node]s. [Node] is a closed enum over every
//!     construct the builder knows: names and literals, calls and member access, operators,
//!     and statements. Several surface forms are desugared on the way in, so the node set is
//!     smaller than the grammar:
//!
//!         - `a += b` (and the other compound assignments) is `Assign(a, Binary(a, b))`
//!         - `++a` is `Assign(a, Binary(a, 1))`, while `a++` stays a [Postfix] node
//!         - `a, b` and `var a, b` are both an [AssignmentBlock]
//!         - `c ? a : b` is an [If] flagged as ternary
//!         - `do ... while` is a [While] with [WhileStyle::PostTest]
//!
//! Locations
//!
//!     Every node carries the byte [Span] of the construct it was built from. Spans are
//!     metadata: nothing in the builder depends on them. Use [SourceLocation] to turn a span
//!     into line:column positions.

pub mod node;
pub mod range;

pub use node::{
    ArrayLiteral, Assign, AssignmentBlock, Binary, BinaryOperator, Block, BooleanLiteral, Break,
    Call, Catch, Continue, Delete, FloatLiteral, ForIn, ForStep, Function, Identifier, If, In,
    IndexAccess, InstanceOf, IntegerLiteral, Logical, LogicalOperator, MemberAccess, New, Node,
    NullLiteral, ObjectLiteral, Postfix, PostfixOperator, Property, RegexLiteral, Return,
    StrictCompare, StrictOperator, StringLiteral, Switch, SwitchCase, Throw, Try, TypeOf, Unary,
    UnaryOperator, UnsignedRightShift, Void, While, WhileStyle, With,
};
pub use range::{Position, SourceLocation, Span};
