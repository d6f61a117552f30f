//! Token definitions for ECMAScript 3 source text
//!
//!     This module defines all the tokens that can be produced by the ES3 lexer. The tokens are
//!     defined using the logos derive macro. Tokens carry no payload: the text of identifiers,
//!     literals and operators is recovered by slicing the source with the token's byte range,
//!     which keeps the enum `Copy` and the lexer allocation free.
//!
//!     Horizontal whitespace is skipped by logos. Line terminators and comments are real tokens,
//!     because the parser needs them for automatic semicolon insertion (a multi-line comment
//!     containing a line break counts as a line terminator).
//!
//!     Regular expression literals are not tokens. Whether `/` starts a division or a regex
//!     depends on the parser's position in the grammar, so the parser re-scans the source
//!     itself when it meets `/` or `/=` in operand position.

use logos::Logos;

/// All possible tokens in ES3 source text
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[logos(skip r"[ \t\u{000B}\u{000C}\u{00A0}\u{FEFF}]+")]
pub enum Token {
    // Trivia the parser cares about
    #[regex(r"\r\n|\n|\r|\u{2028}|\u{2029}")]
    LineTerminator,
    #[regex(r"//[^\n\r\u{2028}\u{2029}]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // Keywords
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("continue")]
    Continue,
    #[token("debugger")]
    Debugger,
    #[token("default")]
    Default,
    #[token("delete")]
    Delete,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("instanceof")]
    Instanceof,
    #[token("new")]
    New,
    #[token("return")]
    Return,
    #[token("switch")]
    Switch,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("typeof")]
    Typeof,
    #[token("var")]
    Var,
    #[token("void")]
    Void,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Names and literals
    /// Letters of any script, `_` and `$`; digits, combining marks and connectors after the
    /// first character
    #[regex(r"[\p{L}\p{Nl}_$][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}$]*")]
    Identifier,
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    DecimalLiteral,
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexIntegerLiteral,
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#)]
    #[regex(r#"'([^'\\\n\r]|\\[^\n\r])*'"#)]
    StringLiteral,

    // Brackets and separators
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Relational and equality
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,
    #[token("==")]
    Eq,
    #[token("!=")]
    Neq,
    #[token("===")]
    Same,
    #[token("!==")]
    NotSame,

    // Arithmetic, bitwise and logical
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    Shu,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // Assignment
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token(">>>=")]
    ShuAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
}

impl Token {
    /// Line terminators and comments, which the parser skips over
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::LineTerminator | Token::LineComment | Token::BlockComment
        )
    }

    /// Reserved words (ES3 keywords plus the `null`/`true`/`false` literals)
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Break
                | Token::Case
                | Token::Catch
                | Token::Continue
                | Token::Debugger
                | Token::Default
                | Token::Delete
                | Token::Do
                | Token::Else
                | Token::Finally
                | Token::For
                | Token::Function
                | Token::If
                | Token::In
                | Token::Instanceof
                | Token::New
                | Token::Return
                | Token::Switch
                | Token::This
                | Token::Throw
                | Token::Try
                | Token::Typeof
                | Token::Var
                | Token::Void
                | Token::While
                | Token::With
                | Token::Null
                | Token::True
                | Token::False
        )
    }

    /// Tokens that may start a regular expression literal in operand position
    pub fn may_start_regex(&self) -> bool {
        matches!(self, Token::Slash | Token::SlashAssign)
    }
}
