//! Intermediate Representation for Parsers
//!
//! This module defines the parse tree that parsers produce and the AST builder consumes.
//! The tree is grammar shaped: every node has a kind (with a stable integer code), the raw
//! text of the token it stems from, its byte range in the source, and ordered children.
//!
//! Imaginary kinds (`BLOCK`, `EXPR`, `CALL`, `ARGS`, ...) group children the way the classic
//! ES3 grammar does; their text is the kind's display name.
//!
//! There is no parent link. The one place the builder needs to reshape the tree (the `new`
//! rewrite) works by value on an owned subtree, see
//! [new_rewrite](crate::es3::building::new_rewrite).

use std::fmt;
use std::ops::Range;

macro_rules! node_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// The type of a node in the parse tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        #[repr(u16)]
        pub enum NodeKind {
            $($variant,)*
        }

        /// Display names, indexed by [NodeKind::code]. Read only, used for diagnostics.
        pub static NODE_KIND_NAMES: &[&str] = &[$($name,)*];

        impl NodeKind {
            /// Every kind, in code order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];
        }
    };
}

node_kinds! {
    Nil => "NIL",
    Block => "BLOCK",
    Var => "VAR",
    Expr => "EXPR",
    ParExpr => "PAREXPR",
    CExpr => "CEXPR",
    Object => "OBJECT",
    NamedValue => "NAMEDVALUE",
    Array => "ARRAY",
    Item => "ITEM",
    Function => "FUNCTION",
    Args => "ARGS",
    Return => "RETURN",
    Call => "CALL",
    New => "NEW",
    ByField => "BYFIELD",
    ByIndex => "BYINDEX",
    If => "IF",
    Que => "QUE",
    Switch => "SWITCH",
    Case => "CASE",
    Default => "DEFAULT",
    This => "THIS",
    Identifier => "Identifier",
    Try => "TRY",
    Catch => "CATCH",
    Finally => "FINALLY",
    Throw => "THROW",
    In => "IN",
    InstanceOf => "INSTANCEOF",
    While => "WHILE",
    Do => "DO",
    For => "FOR",
    ForStep => "FORSTEP",
    ForIter => "FORITER",
    Break => "BREAK",
    Continue => "CONTINUE",
    Labelled => "LABELLED",
    With => "WITH",
    Debugger => "DEBUGGER",
    DecimalLiteral => "DecimalLiteral",
    HexIntegerLiteral => "HexIntegerLiteral",
    StringLiteral => "StringLiteral",
    RegularExpressionLiteral => "RegularExpressionLiteral",
    Null => "NULL",
    True => "TRUE",
    False => "FALSE",
    Assign => "ASSIGN",
    AddAssign => "ADDASS",
    SubAssign => "SUBASS",
    MulAssign => "MULASS",
    DivAssign => "DIVASS",
    ModAssign => "MODASS",
    ShlAssign => "SHLASS",
    ShrAssign => "SHRASS",
    ShuAssign => "SHUASS",
    AndAssign => "ANDASS",
    OrAssign => "ORASS",
    XorAssign => "XORASS",
    Add => "ADD",
    Sub => "SUB",
    Mul => "MUL",
    Div => "DIV",
    Mod => "MOD",
    Eq => "EQ",
    Neq => "NEQ",
    Same => "SAME",
    NotSame => "NSAME",
    Lt => "LT",
    Gt => "GT",
    Lte => "LTE",
    Gte => "GTE",
    Shl => "SHL",
    Shr => "SHR",
    Shu => "SHU",
    And => "AND",
    Or => "OR",
    Xor => "XOR",
    LogicalAnd => "LAND",
    LogicalOr => "LOR",
    Inc => "INC",
    Dec => "DEC",
    PostInc => "PINC",
    PostDec => "PDEC",
    Inv => "INV",
    Not => "NOT",
    Neg => "NEG",
    Pos => "POS",
    TypeOf => "TYPEOF",
    Void => "VOID",
    Delete => "DELETE",
}

impl NodeKind {
    /// The integer type code of this kind
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look a kind up by its integer type code
    pub fn from_code(code: u16) -> Option<NodeKind> {
        Self::ALL.get(code as usize).copied()
    }

    /// The display name used in diagnostics
    pub fn name(self) -> &'static str {
        NODE_KIND_NAMES[self as usize]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node in the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub kind: NodeKind,
    pub text: String,
    pub span: Range<usize>,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    /// Creates a new `ParseNode`.
    pub fn new(
        kind: NodeKind,
        text: impl Into<String>,
        span: Range<usize>,
        children: Vec<ParseNode>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            children,
        }
    }

    /// A childless node for a token.
    pub fn leaf(kind: NodeKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Self::new(kind, text, span, Vec::new())
    }

    /// An imaginary grouping node; its text is the kind's display name.
    pub fn imaginary(kind: NodeKind, span: Range<usize>, children: Vec<ParseNode>) -> Self {
        Self::new(kind, kind.name(), span, children)
    }

    pub fn child(&self, index: usize) -> Option<&ParseNode> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_table_matches_kinds() {
        assert_eq!(NODE_KIND_NAMES.len(), NodeKind::ALL.len());
        for (code, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, code);
            assert_eq!(NodeKind::from_code(code as u16), Some(*kind));
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(NodeKind::ByField.name(), "BYFIELD");
        assert_eq!(NodeKind::Identifier.to_string(), "Identifier");
        assert_eq!(NodeKind::ShuAssign.name(), "SHUASS");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(NodeKind::from_code(u16::MAX), None);
    }

    #[test]
    fn test_imaginary_text_is_kind_name() {
        let node = ParseNode::imaginary(NodeKind::Args, 3..5, vec![]);
        assert_eq!(node.text, "ARGS");
        assert_eq!(node.child_count(), 0);
        assert!(node.is(NodeKind::Args));
    }
}
