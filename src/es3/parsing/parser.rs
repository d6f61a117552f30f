//! Recursive-descent ES3 parser
//!
//! Produces the grammar-shaped [ParseNode] tree. The parser pulls tokens lazily from a logos
//! lexer with one token of lookahead. Line terminators and comments are consumed here and only
//! leave a `newline_before` mark on the next significant token, which drives automatic
//! semicolon insertion and the restricted productions (`return`, `break`, `continue`, postfix
//! `++`/`--`).
//!
//! Tree shapes:
//!
//! - a unit with several statements is rooted at `NIL`; a single statement is its own root
//! - expression statements are wrapped in `EXPR`, parenthesized expressions in `PAREXPR`
//! - `NEW` takes a primary expression only, so `new a.b()` comes out as
//!   `CALL(BYFIELD(NEW(a), b), ARGS)` and is straightened out by the builder
//! - `FOR` holds either `FORSTEP(EXPR, EXPR, EXPR)` (each with zero or one child) or
//!   `FORITER(EXPR(target), EXPR(object))`, followed by the body

use super::common::ParseError;
use super::ir::{NodeKind, ParseNode};
use crate::es3::lexing::{LexError, Token};
use logos::Logos;
use std::ops::Range;

/// Nesting limit used when the caller does not configure one
pub const DEFAULT_MAX_DEPTH: usize = 512;

pub struct Parser<'s> {
    source: &'s str,
    lexer: logos::Lexer<'s, Token>,
    current: Option<(Token, Range<usize>)>,
    newline_before: bool,
    last_end: usize,
    depth: usize,
    max_depth: usize,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Result<Self, ParseError> {
        let mut parser = Parser {
            source,
            lexer: Token::lexer(source),
            current: None,
            newline_before: false,
            last_end: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        };
        parser.advance()?;
        Ok(parser)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a whole source unit.
    ///
    /// Returns `None` for a unit without statements, the statement itself for a single
    /// statement, and a `NIL` node holding all statements otherwise.
    ///
    /// Recursion happens on the current thread's stack. [parse_source_with](super::parse_source_with)
    /// runs it on a stack sized for the nesting limit.
    pub fn parse_program(&mut self) -> Result<Option<ParseNode>, ParseError> {
        let mut statements = Vec::new();
        while self.current.is_some() {
            if self.eat(Token::Semicolon)? {
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(match statements.len() {
            0 => None,
            1 => statements.pop(),
            _ => {
                let span = statements[0].span.start..self.last_end;
                Some(ParseNode::imaginary(NodeKind::Nil, span, statements))
            }
        })
    }

    // ---------------------------------------------------------------------------------------
    // Token plumbing
    // ---------------------------------------------------------------------------------------

    fn advance(&mut self) -> Result<(), ParseError> {
        if let Some((_, span)) = &self.current {
            self.last_end = span.end;
        }
        self.newline_before = false;
        loop {
            match self.lexer.next() {
                None => {
                    self.current = None;
                    return Ok(());
                }
                Some(Err(())) => {
                    return Err(ParseError::Lex(LexError::UnexpectedCharacter {
                        text: self.lexer.slice().to_string(),
                        span: self.lexer.span(),
                    }))
                }
                Some(Ok(Token::LineTerminator)) => self.newline_before = true,
                Some(Ok(Token::LineComment)) => {}
                Some(Ok(Token::BlockComment)) => {
                    if self.lexer.slice().contains(is_line_terminator) {
                        self.newline_before = true;
                    }
                }
                Some(Ok(token)) => {
                    self.current = Some((token, self.lexer.span()));
                    return Ok(());
                }
            }
        }
    }

    fn peek(&self) -> Option<Token> {
        self.current.as_ref().map(|(token, _)| *token)
    }

    fn at(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn current_span(&self) -> Range<usize> {
        match &self.current {
            Some((_, span)) => span.clone(),
            None => self.source.len()..self.source.len(),
        }
    }

    fn current_text(&self) -> &'s str {
        let source: &'s str = self.source;
        match &self.current {
            Some((_, span)) => &source[span.clone()],
            None => "",
        }
    }

    fn span_from(&self, start: usize) -> Range<usize> {
        start..self.last_end.max(start)
    }

    fn eat(&mut self, token: Token) -> Result<bool, ParseError> {
        if self.at(token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<Range<usize>, ParseError> {
        if self.at(token) {
            let span = self.current_span();
            self.advance()?;
            Ok(span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match &self.current {
            Some(_) => format!("'{}'", self.current_text()),
            None => "end of input".to_string(),
        };
        ParseError::Unexpected {
            expected: expected.to_string(),
            found,
            span: self.current_span(),
        }
    }

    /// Consume the current token as a childless node of `kind`.
    fn leaf(&mut self, kind: NodeKind) -> Result<ParseNode, ParseError> {
        let span = self.current_span();
        let text = self.current_text();
        self.advance()?;
        Ok(ParseNode::leaf(kind, text, span))
    }

    /// Automatic semicolon insertion: an explicit `;`, or a `}`, the end of input, or a line
    /// break before the current token.
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat(Token::Semicolon)? {
            return Ok(());
        }
        if self.current.is_none() || self.at(Token::RBrace) || self.newline_before {
            return Ok(());
        }
        Err(self.unexpected("';'"))
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                span: self.current_span(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ---------------------------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<ParseNode, ParseError> {
        self.enter()?;
        let statement = match self.peek() {
            Some(Token::LBrace) => self.parse_block(),
            Some(Token::Var) => self.parse_var_statement(),
            Some(Token::Semicolon) => {
                // empty statement in body position
                let span = self.current_span();
                self.advance()?;
                Ok(ParseNode::imaginary(NodeKind::Block, span, Vec::new()))
            }
            Some(Token::If) => self.parse_if(),
            Some(Token::Do) => self.parse_do_while(),
            Some(Token::While) => self.parse_while(),
            Some(Token::For) => self.parse_for(),
            Some(Token::Continue) => self.parse_jump(NodeKind::Continue),
            Some(Token::Break) => self.parse_jump(NodeKind::Break),
            Some(Token::Return) => self.parse_return(),
            Some(Token::With) => self.parse_with(),
            Some(Token::Switch) => self.parse_switch(),
            Some(Token::Throw) => self.parse_throw(),
            Some(Token::Try) => self.parse_try(),
            Some(Token::Function) => self.parse_function(true),
            Some(Token::Debugger) => {
                let node = self.leaf(NodeKind::Debugger)?;
                self.consume_semicolon()?;
                Ok(node)
            }
            _ => self.parse_expression_statement(),
        };
        self.leave();
        statement
    }

    fn parse_statement_list(&mut self) -> Result<Vec<ParseNode>, ParseError> {
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                None | Some(Token::RBrace) | Some(Token::Case) | Some(Token::Default) => break,
                Some(Token::Semicolon) => self.advance()?,
                Some(_) => statements.push(self.parse_statement()?),
            }
        }
        Ok(statements)
    }

    fn parse_block(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::LBrace, "'{'")?.start;
        let statements = self.parse_statement_list()?;
        self.expect(Token::RBrace, "'}'")?;
        Ok(ParseNode::imaginary(
            NodeKind::Block,
            self.span_from(start),
            statements,
        ))
    }

    fn parse_var_statement(&mut self) -> Result<ParseNode, ParseError> {
        let declarations = self.parse_var_declarations(true)?;
        self.consume_semicolon()?;
        Ok(declarations)
    }

    fn parse_var_declarations(&mut self, allow_in: bool) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Var, "'var'")?.start;
        let mut declarators = vec![self.parse_declarator(allow_in)?];
        while self.eat(Token::Comma)? {
            declarators.push(self.parse_declarator(allow_in)?);
        }
        Ok(ParseNode::new(
            NodeKind::Var,
            "var",
            self.span_from(start),
            declarators,
        ))
    }

    fn parse_declarator(&mut self, allow_in: bool) -> Result<ParseNode, ParseError> {
        let name = self.parse_identifier()?;
        if !self.at(Token::Assign) {
            return Ok(name);
        }
        let operator = self.current_text();
        self.advance()?;
        let value = self.parse_assignment(allow_in)?;
        let span = name.span.start..value.span.end;
        Ok(ParseNode::new(
            NodeKind::Assign,
            operator,
            span,
            vec![name, value],
        ))
    }

    fn parse_identifier(&mut self) -> Result<ParseNode, ParseError> {
        if self.at(Token::Identifier) {
            self.leaf(NodeKind::Identifier)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn parse_if(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::If, "'if'")?.start;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement()?;
        let mut children = vec![test, consequent];
        if self.eat(Token::Else)? {
            children.push(self.parse_statement()?);
        }
        Ok(ParseNode::new(
            NodeKind::If,
            "if",
            self.span_from(start),
            children,
        ))
    }

    /// `( Expression )` of a statement head; no `PAREXPR` wrapper.
    fn parse_paren_expression(&mut self) -> Result<ParseNode, ParseError> {
        self.expect(Token::LParen, "'('")?;
        let expression = self.parse_expression(true)?;
        self.expect(Token::RParen, "')'")?;
        Ok(expression)
    }

    fn parse_do_while(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Do, "'do'")?.start;
        let body = self.parse_statement()?;
        self.expect(Token::While, "'while'")?;
        let test = self.parse_paren_expression()?;
        let span = self.span_from(start);
        self.eat(Token::Semicolon)?;
        Ok(ParseNode::new(NodeKind::Do, "do", span, vec![body, test]))
    }

    fn parse_while(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::While, "'while'")?.start;
        let test = self.parse_paren_expression()?;
        let body = self.parse_statement()?;
        Ok(ParseNode::new(
            NodeKind::While,
            "while",
            self.span_from(start),
            vec![test, body],
        ))
    }

    fn parse_for(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::For, "'for'")?.start;
        self.expect(Token::LParen, "'('")?;
        let head = self.parse_for_head()?;
        self.expect(Token::RParen, "')'")?;
        let body = self.parse_statement()?;
        Ok(ParseNode::new(
            NodeKind::For,
            "for",
            self.span_from(start),
            vec![head, body],
        ))
    }

    fn parse_for_head(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.current_span().start;
        let init = match self.peek() {
            Some(Token::Semicolon) => None,
            Some(Token::Var) => Some(self.parse_var_declarations(false)?),
            _ => Some(self.parse_expression(false)?),
        };

        match init {
            Some(target) if self.at(Token::In) => {
                if target.is(NodeKind::Var) && target.child_count() != 1 {
                    return Err(self.unexpected("';'"));
                }
                self.advance()?;
                let object = self.parse_expression(true)?;
                Ok(ParseNode::imaginary(
                    NodeKind::ForIter,
                    self.span_from(start),
                    vec![expression_clause(target), expression_clause(object)],
                ))
            }
            init => self.parse_for_step(start, init),
        }
    }

    fn parse_for_step(
        &mut self,
        start: usize,
        init: Option<ParseNode>,
    ) -> Result<ParseNode, ParseError> {
        let init = match init {
            Some(init) => expression_clause(init),
            None => self.empty_clause(),
        };
        self.expect(Token::Semicolon, "';'")?;

        let test = if self.at(Token::Semicolon) {
            self.empty_clause()
        } else {
            expression_clause(self.parse_expression(true)?)
        };
        self.expect(Token::Semicolon, "';'")?;

        let update = if self.at(Token::RParen) {
            self.empty_clause()
        } else {
            expression_clause(self.parse_expression(true)?)
        };

        Ok(ParseNode::imaginary(
            NodeKind::ForStep,
            self.span_from(start),
            vec![init, test, update],
        ))
    }

    fn empty_clause(&self) -> ParseNode {
        let at = self.current_span().start;
        ParseNode::imaginary(NodeKind::Expr, at..at, Vec::new())
    }

    fn parse_jump(&mut self, kind: NodeKind) -> Result<ParseNode, ParseError> {
        let start = self.current_span().start;
        let keyword = self.current_text();
        self.advance()?;
        let mut children = Vec::new();
        if self.at(Token::Identifier) && !self.newline_before {
            children.push(self.leaf(NodeKind::Identifier)?);
        }
        let span = self.span_from(start);
        self.consume_semicolon()?;
        Ok(ParseNode::new(kind, keyword, span, children))
    }

    fn parse_return(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Return, "'return'")?.start;
        let mut children = Vec::new();
        let ends_here = self.newline_before
            || matches!(self.peek(), None | Some(Token::Semicolon) | Some(Token::RBrace));
        if !ends_here {
            children.push(self.parse_expression(true)?);
        }
        let span = self.span_from(start);
        self.consume_semicolon()?;
        Ok(ParseNode::new(NodeKind::Return, "return", span, children))
    }

    fn parse_throw(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Throw, "'throw'")?.start;
        if self.newline_before {
            return Err(self.unexpected("expression on the same line as 'throw'"));
        }
        let value = self.parse_expression(true)?;
        let span = self.span_from(start);
        self.consume_semicolon()?;
        Ok(ParseNode::new(NodeKind::Throw, "throw", span, vec![value]))
    }

    fn parse_with(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::With, "'with'")?.start;
        let object = self.parse_paren_expression()?;
        let body = self.parse_statement()?;
        Ok(ParseNode::new(
            NodeKind::With,
            "with",
            self.span_from(start),
            vec![object, body],
        ))
    }

    fn parse_switch(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Switch, "'switch'")?.start;
        let discriminant = self.parse_paren_expression()?;
        self.expect(Token::LBrace, "'{'")?;

        let mut children = vec![discriminant];
        let mut seen_default = false;
        loop {
            match self.peek() {
                Some(Token::Case) => {
                    let clause_start = self.current_span().start;
                    self.advance()?;
                    let test = self.parse_expression(true)?;
                    self.expect(Token::Colon, "':'")?;
                    let mut clause = vec![test];
                    clause.extend(self.parse_statement_list()?);
                    children.push(ParseNode::new(
                        NodeKind::Case,
                        "case",
                        self.span_from(clause_start),
                        clause,
                    ));
                }
                Some(Token::Default) => {
                    if seen_default {
                        return Err(self.unexpected("'case' or '}' after the default clause"));
                    }
                    seen_default = true;
                    let clause_start = self.current_span().start;
                    self.advance()?;
                    self.expect(Token::Colon, "':'")?;
                    let body = self.parse_statement_list()?;
                    children.push(ParseNode::new(
                        NodeKind::Default,
                        "default",
                        self.span_from(clause_start),
                        body,
                    ));
                }
                _ => break,
            }
        }

        self.expect(Token::RBrace, "'}'")?;
        Ok(ParseNode::new(
            NodeKind::Switch,
            "switch",
            self.span_from(start),
            children,
        ))
    }

    fn parse_try(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Try, "'try'")?.start;
        let mut children = vec![self.parse_block()?];

        if self.at(Token::Catch) {
            let clause_start = self.current_span().start;
            self.advance()?;
            self.expect(Token::LParen, "'('")?;
            let binding = self.parse_identifier()?;
            self.expect(Token::RParen, "')'")?;
            let body = self.parse_block()?;
            children.push(ParseNode::new(
                NodeKind::Catch,
                "catch",
                self.span_from(clause_start),
                vec![binding, body],
            ));
        }

        if self.at(Token::Finally) {
            let clause_start = self.current_span().start;
            self.advance()?;
            let body = self.parse_block()?;
            children.push(ParseNode::new(
                NodeKind::Finally,
                "finally",
                self.span_from(clause_start),
                vec![body],
            ));
        }

        if children.len() == 1 {
            return Err(self.unexpected("'catch' or 'finally'"));
        }
        Ok(ParseNode::new(
            NodeKind::Try,
            "try",
            self.span_from(start),
            children,
        ))
    }

    /// Function declaration (`require_name`) or expression.
    ///
    /// Children: optional name, `ARGS` of parameter identifiers, body `BLOCK`.
    fn parse_function(&mut self, require_name: bool) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::Function, "'function'")?.start;
        let mut children = Vec::new();
        if self.at(Token::Identifier) {
            children.push(self.leaf(NodeKind::Identifier)?);
        } else if require_name {
            return Err(self.unexpected("function name"));
        }

        let params_start = self.expect(Token::LParen, "'('")?.start;
        let mut params = Vec::new();
        if !self.at(Token::RParen) {
            params.push(self.parse_identifier()?);
            while self.eat(Token::Comma)? {
                params.push(self.parse_identifier()?);
            }
        }
        self.expect(Token::RParen, "')'")?;
        children.push(ParseNode::imaginary(
            NodeKind::Args,
            self.span_from(params_start),
            params,
        ));
        children.push(self.parse_block()?);

        Ok(ParseNode::new(
            NodeKind::Function,
            "function",
            self.span_from(start),
            children,
        ))
    }

    /// Expression statement, or a labelled statement when the expression is a lone
    /// identifier followed by `:`.
    fn parse_expression_statement(&mut self) -> Result<ParseNode, ParseError> {
        let expression = self.parse_expression(true)?;

        if expression.is(NodeKind::Identifier) && self.at(Token::Colon) {
            self.advance()?;
            let body = self.parse_statement()?;
            let span = expression.span.start..body.span.end;
            return Ok(ParseNode::imaginary(
                NodeKind::Labelled,
                span,
                vec![expression, body],
            ));
        }

        self.consume_semicolon()?;
        Ok(expression_clause(expression))
    }

    // ---------------------------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------------------------

    /// Comma expression. `allow_in` is false inside a `for` head before the first `;`.
    fn parse_expression(&mut self, allow_in: bool) -> Result<ParseNode, ParseError> {
        let first = self.parse_assignment(allow_in)?;
        if !self.at(Token::Comma) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(Token::Comma)? {
            operands.push(self.parse_assignment(allow_in)?);
        }
        let span = self.span_from(operands[0].span.start);
        Ok(ParseNode::imaginary(NodeKind::CExpr, span, operands))
    }

    fn parse_assignment(&mut self, allow_in: bool) -> Result<ParseNode, ParseError> {
        self.enter()?;
        let result = self.parse_assignment_inner(allow_in);
        self.leave();
        result
    }

    fn parse_assignment_inner(&mut self, allow_in: bool) -> Result<ParseNode, ParseError> {
        let target = self.parse_conditional(allow_in)?;
        let kind = match self.peek().and_then(assignment_kind) {
            Some(kind) => kind,
            None => return Ok(target),
        };
        let operator = self.current_text();
        self.advance()?;
        let value = self.parse_assignment(allow_in)?;
        let span = target.span.start..value.span.end;
        Ok(ParseNode::new(kind, operator, span, vec![target, value]))
    }

    fn parse_conditional(&mut self, allow_in: bool) -> Result<ParseNode, ParseError> {
        let test = self.parse_binary(0, allow_in)?;
        if !self.at(Token::Question) {
            return Ok(test);
        }
        self.advance()?;
        let consequent = self.parse_assignment(true)?;
        self.expect(Token::Colon, "':'")?;
        let alternate = self.parse_assignment(allow_in)?;
        let span = test.span.start..alternate.span.end;
        Ok(ParseNode::new(
            NodeKind::Que,
            "?",
            span,
            vec![test, consequent, alternate],
        ))
    }

    /// Precedence climbing over the left-associative binary operators.
    fn parse_binary(&mut self, min_precedence: u8, allow_in: bool) -> Result<ParseNode, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some((precedence, kind)) = self
            .peek()
            .and_then(|token| binary_operator(token, allow_in))
        {
            if precedence < min_precedence {
                break;
            }
            let operator = self.current_text();
            self.advance()?;
            self.enter()?;
            let right = self.parse_binary(precedence + 1, allow_in)?;
            self.leave();
            let span = left.span.start..right.span.end;
            left = ParseNode::new(kind, operator, span, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ParseNode, ParseError> {
        let kind = match self.peek() {
            Some(Token::Delete) => NodeKind::Delete,
            Some(Token::Void) => NodeKind::Void,
            Some(Token::Typeof) => NodeKind::TypeOf,
            Some(Token::PlusPlus) => NodeKind::Inc,
            Some(Token::MinusMinus) => NodeKind::Dec,
            Some(Token::Plus) => NodeKind::Pos,
            Some(Token::Minus) => NodeKind::Neg,
            Some(Token::Tilde) => NodeKind::Inv,
            Some(Token::Bang) => NodeKind::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.current_span().start;
        let operator = self.current_text();
        self.advance()?;
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();
        let span = start..operand.span.end;
        Ok(ParseNode::new(kind, operator, span, vec![operand]))
    }

    fn parse_postfix(&mut self) -> Result<ParseNode, ParseError> {
        let operand = self.parse_left_hand_side()?;
        if self.newline_before {
            return Ok(operand);
        }
        let kind = match self.peek() {
            Some(Token::PlusPlus) => NodeKind::PostInc,
            Some(Token::MinusMinus) => NodeKind::PostDec,
            _ => return Ok(operand),
        };
        let operator = self.current_text();
        let end = self.current_span().end;
        self.advance()?;
        let span = operand.span.start..end;
        Ok(ParseNode::new(kind, operator, span, vec![operand]))
    }

    /// Member access, indexing and calls, applied left to right onto a member base.
    fn parse_left_hand_side(&mut self) -> Result<ParseNode, ParseError> {
        let mut node = self.parse_member_base()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance()?;
                    let name = self.parse_property_identifier()?;
                    let span = node.span.start..name.span.end;
                    node = ParseNode::imaginary(NodeKind::ByField, span, vec![node, name]);
                }
                Some(Token::LBracket) => {
                    self.advance()?;
                    let index = self.parse_expression(true)?;
                    let end = self.expect(Token::RBracket, "']'")?.end;
                    let span = node.span.start..end;
                    node = ParseNode::imaginary(NodeKind::ByIndex, span, vec![node, index]);
                }
                Some(Token::LParen) => {
                    let arguments = self.parse_arguments()?;
                    let span = node.span.start..arguments.span.end;
                    node = ParseNode::imaginary(NodeKind::Call, span, vec![node, arguments]);
                }
                _ => return Ok(node),
            }
        }
    }

    fn parse_member_base(&mut self) -> Result<ParseNode, ParseError> {
        if !self.at(Token::New) {
            return self.parse_primary();
        }
        let start = self.current_span().start;
        self.advance()?;
        self.enter()?;
        let operand = self.parse_member_base()?;
        self.leave();
        let span = start..operand.span.end;
        Ok(ParseNode::new(NodeKind::New, "new", span, vec![operand]))
    }

    /// After `.` any identifier name is allowed, reserved words included.
    fn parse_property_identifier(&mut self) -> Result<ParseNode, ParseError> {
        match self.peek() {
            Some(token) if token == Token::Identifier || token.is_keyword() => {
                self.leaf(NodeKind::Identifier)
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    fn parse_arguments(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::LParen, "'('")?.start;
        let mut arguments = Vec::new();
        if !self.at(Token::RParen) {
            arguments.push(self.parse_assignment(true)?);
            while self.eat(Token::Comma)? {
                arguments.push(self.parse_assignment(true)?);
            }
        }
        self.expect(Token::RParen, "')'")?;
        Ok(ParseNode::imaginary(
            NodeKind::Args,
            self.span_from(start),
            arguments,
        ))
    }

    fn parse_primary(&mut self) -> Result<ParseNode, ParseError> {
        match self.peek() {
            Some(Token::This) => self.leaf(NodeKind::This),
            Some(Token::Identifier) => self.leaf(NodeKind::Identifier),
            Some(Token::DecimalLiteral) => self.leaf(NodeKind::DecimalLiteral),
            Some(Token::HexIntegerLiteral) => self.leaf(NodeKind::HexIntegerLiteral),
            Some(Token::StringLiteral) => self.leaf(NodeKind::StringLiteral),
            Some(Token::Null) => self.leaf(NodeKind::Null),
            Some(Token::True) => self.leaf(NodeKind::True),
            Some(Token::False) => self.leaf(NodeKind::False),
            Some(token) if token.may_start_regex() => self.parse_regex(),
            Some(Token::LBracket) => self.parse_array(),
            Some(Token::LBrace) => self.parse_object(),
            Some(Token::Function) => self.parse_function(false),
            Some(Token::LParen) => {
                let start = self.current_span().start;
                self.advance()?;
                let inner = self.parse_expression(true)?;
                let end = self.expect(Token::RParen, "')'")?.end;
                Ok(ParseNode::imaginary(
                    NodeKind::ParExpr,
                    start..end,
                    vec![inner],
                ))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Re-scan a regular expression literal from the source and move the lexer past it.
    fn parse_regex(&mut self) -> Result<ParseNode, ParseError> {
        let slash = self.current_span();
        let end = scan_regex(self.source, slash.start).ok_or(ParseError::UnterminatedRegex {
            span: slash.start..self.source.len(),
        })?;
        self.lexer.bump(end - slash.end);

        let span = slash.start..end;
        let node = ParseNode::leaf(
            NodeKind::RegularExpressionLiteral,
            &self.source[span.clone()],
            span.clone(),
        );
        self.current = Some((Token::Slash, span));
        self.advance()?;
        Ok(node)
    }

    fn parse_array(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::LBracket, "'['")?.start;
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBracket) => break,
                Some(Token::Comma) => {
                    // hole
                    let at = self.current_span().start;
                    items.push(ParseNode::imaginary(NodeKind::Item, at..at, Vec::new()));
                    self.advance()?;
                }
                _ => {
                    let element = self.parse_assignment(true)?;
                    let span = element.span.clone();
                    items.push(ParseNode::imaginary(NodeKind::Item, span, vec![element]));
                    if !self.eat(Token::Comma)? {
                        break;
                    }
                }
            }
        }
        let end = self.expect(Token::RBracket, "']'")?.end;
        Ok(ParseNode::imaginary(NodeKind::Array, start..end, items))
    }

    fn parse_object(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.expect(Token::LBrace, "'{'")?.start;
        let mut properties = Vec::new();
        while !self.at(Token::RBrace) {
            let name = self.parse_property_name()?;
            self.expect(Token::Colon, "':'")?;
            let value = self.parse_assignment(true)?;
            let span = name.span.start..value.span.end;
            properties.push(ParseNode::imaginary(
                NodeKind::NamedValue,
                span,
                vec![name, value],
            ));
            if !self.eat(Token::Comma)? {
                break;
            }
        }
        let end = self.expect(Token::RBrace, "'}'")?.end;
        Ok(ParseNode::imaginary(NodeKind::Object, start..end, properties))
    }

    fn parse_property_name(&mut self) -> Result<ParseNode, ParseError> {
        match self.peek() {
            Some(Token::StringLiteral) => self.leaf(NodeKind::StringLiteral),
            Some(Token::DecimalLiteral) => self.leaf(NodeKind::DecimalLiteral),
            Some(Token::HexIntegerLiteral) => self.leaf(NodeKind::HexIntegerLiteral),
            Some(token) if token == Token::Identifier || token.is_keyword() => {
                self.leaf(NodeKind::Identifier)
            }
            _ => Err(self.unexpected("property name")),
        }
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn expression_clause(node: ParseNode) -> ParseNode {
    let span = node.span.clone();
    ParseNode::imaginary(NodeKind::Expr, span, vec![node])
}

fn assignment_kind(token: Token) -> Option<NodeKind> {
    let kind = match token {
        Token::Assign => NodeKind::Assign,
        Token::PlusAssign => NodeKind::AddAssign,
        Token::MinusAssign => NodeKind::SubAssign,
        Token::StarAssign => NodeKind::MulAssign,
        Token::SlashAssign => NodeKind::DivAssign,
        Token::PercentAssign => NodeKind::ModAssign,
        Token::ShlAssign => NodeKind::ShlAssign,
        Token::ShrAssign => NodeKind::ShrAssign,
        Token::ShuAssign => NodeKind::ShuAssign,
        Token::AmpAssign => NodeKind::AndAssign,
        Token::PipeAssign => NodeKind::OrAssign,
        Token::CaretAssign => NodeKind::XorAssign,
        _ => return None,
    };
    Some(kind)
}

/// Binding power and node kind of a binary operator token. `in` only counts when allowed.
fn binary_operator(token: Token, allow_in: bool) -> Option<(u8, NodeKind)> {
    let operator = match token {
        Token::PipePipe => (1, NodeKind::LogicalOr),
        Token::AmpAmp => (2, NodeKind::LogicalAnd),
        Token::Pipe => (3, NodeKind::Or),
        Token::Caret => (4, NodeKind::Xor),
        Token::Amp => (5, NodeKind::And),
        Token::Eq => (6, NodeKind::Eq),
        Token::Neq => (6, NodeKind::Neq),
        Token::Same => (6, NodeKind::Same),
        Token::NotSame => (6, NodeKind::NotSame),
        Token::Lt => (7, NodeKind::Lt),
        Token::Gt => (7, NodeKind::Gt),
        Token::Lte => (7, NodeKind::Lte),
        Token::Gte => (7, NodeKind::Gte),
        Token::Instanceof => (7, NodeKind::InstanceOf),
        Token::In if allow_in => (7, NodeKind::In),
        Token::Shl => (8, NodeKind::Shl),
        Token::Shr => (8, NodeKind::Shr),
        Token::Shu => (8, NodeKind::Shu),
        Token::Plus => (9, NodeKind::Add),
        Token::Minus => (9, NodeKind::Sub),
        Token::Star => (10, NodeKind::Mul),
        Token::Slash => (10, NodeKind::Div),
        Token::Percent => (10, NodeKind::Mod),
        _ => return None,
    };
    Some(operator)
}

/// Find the end of a regular expression literal whose opening `/` is at `start`.
///
/// Returns the byte offset just past the flags, or `None` if a line ends first.
fn scan_regex(source: &str, start: usize) -> Option<usize> {
    let body = start + 1;
    let mut chars = source.get(body..)?.char_indices();
    let mut in_class = false;
    let flags_start = loop {
        let (offset, c) = chars.next()?;
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                if is_line_terminator(escaped) {
                    return None;
                }
            }
            c if is_line_terminator(c) => return None,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => break body + offset + 1,
            _ => {}
        }
    };
    let flags_len: usize = source[flags_start..]
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .map(char::len_utf8)
        .sum();
    Some(flags_start + flags_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Option<ParseNode> {
        Parser::new(source)
            .and_then(|mut parser| parser.parse_program())
            .unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::new(source)
            .and_then(|mut parser| parser.parse_program())
            .unwrap_err()
    }

    /// Compact rendering of the parse tree: `KIND` for leaves (or their text for names and
    /// literals), `(KIND child...)` otherwise.
    fn shape(node: &ParseNode) -> String {
        let head = match node.kind {
            NodeKind::Identifier
            | NodeKind::DecimalLiteral
            | NodeKind::HexIntegerLiteral
            | NodeKind::StringLiteral
            | NodeKind::RegularExpressionLiteral => node.text.clone(),
            kind => kind.name().to_string(),
        };
        if node.children.is_empty() {
            head
        } else {
            let children: Vec<String> = node.children.iter().map(shape).collect();
            format!("({} {})", head, children.join(" "))
        }
    }

    fn parse_shape(source: &str) -> String {
        parse(source).map(|node| shape(&node)).unwrap_or_default()
    }

    #[test]
    fn test_empty_unit() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("  ;; // nothing\n"), None);
    }

    #[test]
    fn test_single_statement_is_root() {
        assert_eq!(parse_shape("a;"), "(EXPR a)");
    }

    #[test]
    fn test_multiple_statements_under_nil() {
        assert_eq!(parse_shape("a; b"), "(NIL (EXPR a) (EXPR b))");
    }

    #[test]
    fn test_new_binds_primary_only() {
        assert_eq!(
            parse_shape("new a.b.c()"),
            "(EXPR (CALL (BYFIELD (BYFIELD (NEW a) b) c) ARGS))"
        );
        assert_eq!(
            parse_shape("new a.b().c"),
            "(EXPR (BYFIELD (CALL (BYFIELD (NEW a) b) ARGS) c))"
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse_shape("a + b * c"),
            "(EXPR (ADD a (MUL b c)))"
        );
        assert_eq!(
            parse_shape("a || b && c | d"),
            "(EXPR (LOR a (LAND b (OR c d))))"
        );
        assert_eq!(parse_shape("a - b - c"), "(EXPR (SUB (SUB a b) c))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(
            parse_shape("a = b += c"),
            "(EXPR (ASSIGN a (ADDASS b c)))"
        );
    }

    #[test]
    fn test_conditional() {
        assert_eq!(parse_shape("a ? b : c"), "(EXPR (QUE a b c))");
    }

    #[test]
    fn test_var_declarators() {
        assert_eq!(
            parse_shape("var a = 1, b;"),
            "(VAR (ASSIGN a 1) b)"
        );
    }

    #[test]
    fn test_for_step_clauses() {
        assert_eq!(
            parse_shape("for (;;) {}"),
            "(FOR (FORSTEP EXPR EXPR EXPR) BLOCK)"
        );
        assert_eq!(
            parse_shape("for (i = 0; i < n; i++) x;"),
            "(FOR (FORSTEP (EXPR (ASSIGN i 0)) (EXPR (LT i n)) (EXPR (PINC i))) (EXPR x))"
        );
    }

    #[test]
    fn test_for_in() {
        assert_eq!(
            parse_shape("for (var k in o) {}"),
            "(FOR (FORITER (EXPR (VAR k)) (EXPR o)) BLOCK)"
        );
        assert_eq!(
            parse_shape("for (k in o) {}"),
            "(FOR (FORITER (EXPR k) (EXPR o)) BLOCK)"
        );
    }

    #[test]
    fn test_in_allowed_inside_parens_of_for_init() {
        assert_eq!(
            parse_shape("for (x = (a in b); ;) {}"),
            "(FOR (FORSTEP (EXPR (ASSIGN x (PAREXPR (IN a b)))) EXPR EXPR) BLOCK)"
        );
    }

    #[test]
    fn test_switch_clauses() {
        assert_eq!(
            parse_shape("switch (x) { case 1: a; break; default: b; }"),
            "(SWITCH x (CASE 1 (EXPR a) BREAK) (DEFAULT (EXPR b)))"
        );
    }

    #[test]
    fn test_try_catch_finally() {
        assert_eq!(
            parse_shape("try {} catch (e) {} finally {}"),
            "(TRY BLOCK (CATCH e BLOCK) (FINALLY BLOCK))"
        );
        assert!(matches!(
            parse_err("try {}"),
            ParseError::Unexpected { .. }
        ));
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            parse_shape("function f(a, b) { return a; }"),
            "(FUNCTION f (ARGS a b) (BLOCK (RETURN a)))"
        );
        assert_eq!(
            parse_shape("x = function () {};"),
            "(EXPR (ASSIGN x (FUNCTION ARGS BLOCK)))"
        );
    }

    #[test]
    fn test_labelled_statement() {
        assert_eq!(
            parse_shape("outer: while (a) break outer;"),
            "(LABELLED outer (WHILE a (BREAK outer)))"
        );
    }

    #[test]
    fn test_array_holes_and_objects() {
        assert_eq!(
            parse_shape("x = [1, , 2];"),
            "(EXPR (ASSIGN x (ARRAY (ITEM 1) ITEM (ITEM 2))))"
        );
        assert_eq!(
            parse_shape("x = {a: 1, 'b': 2};"),
            "(EXPR (ASSIGN x (OBJECT (NAMEDVALUE a 1) (NAMEDVALUE 'b' 2))))"
        );
    }

    #[test]
    fn test_regex_literal_rescan() {
        assert_eq!(
            parse_shape("x = /a[/]b/gi;"),
            "(EXPR (ASSIGN x /a[/]b/gi))"
        );
        assert_eq!(parse_shape("x = a / b / c;"), "(EXPR (ASSIGN x (DIV (DIV a b) c)))");
        assert!(matches!(
            parse_err("x = /abc\n/"),
            ParseError::UnterminatedRegex { .. }
        ));
    }

    #[test]
    fn test_semicolon_insertion() {
        assert_eq!(parse_shape("a\nb"), "(NIL (EXPR a) (EXPR b))");
        assert_eq!(
            parse_shape("return\na"),
            "(NIL RETURN (EXPR a))"
        );
        assert_eq!(parse_shape("a\n++b"), "(NIL (EXPR a) (EXPR (INC b)))");
        assert!(matches!(parse_err("a b"), ParseError::Unexpected { .. }));
    }

    #[test]
    fn test_block_comment_with_newline_ends_statement() {
        assert_eq!(parse_shape("a /*\n*/ b"), "(NIL (EXPR a) (EXPR b))");
    }

    #[test]
    fn test_error_positions() {
        let err = parse_err("var 1;");
        assert_eq!(err.span(), 4..5);
        assert_eq!(err.to_string(), "Expected identifier, found '1' at byte 4");

        let err = parse_err("a = ;");
        assert_eq!(err.to_string(), "Expected expression, found ';' at byte 4");

        let err = parse_err("f(");
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_lex_error_surfaces() {
        assert!(matches!(parse_err("a = #"), ParseError::Lex(_)));
    }

    #[test]
    fn test_depth_limit() {
        let source = format!("{}a{}", "(".repeat(50), ")".repeat(50));
        let err = Parser::new(&source)
            .map(|parser| parser.with_max_depth(20))
            .and_then(|mut parser| parser.parse_program())
            .unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: 20, .. }));
    }

    #[test]
    fn test_spans_cover_source() {
        let node = parse("foo.bar(1)").unwrap();
        assert_eq!(node.span, 0..10);
        let call = &node.children[0];
        assert_eq!(call.span, 0..10);
        assert_eq!(call.children[0].span, 0..7);
    }
}
