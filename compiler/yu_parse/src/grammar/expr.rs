//! Expression parsing.
//!
//! Pratt-style `parse_binary(min_prec)` over [`BinaryOp::precedence`],
//! below a right-associative assignment level and above unary and
//! postfix (call / member / index) levels.
//!
//! # Compound operators
//!
//! The lexer emits only single-character operator tokens so that
//! consecutive `>` tokens can close nested generics. In expression
//! context the parser synthesizes `== != <= >= << >> && ||` from
//! byte-adjacent token pairs; `match_binary_op` returns the operator and
//! how many tokens it spans.

use crate::Parser;
use yu_diagnostic::{DiagnosticCode, DiagnosticSink};
use yu_ir::{BinaryOp, TokenKind, UnaryOp, INVALID_INDEX};

impl<'src, S: DiagnosticSink> Parser<'src, S> {
    pub(crate) fn parse_expression(&mut self) -> Option<u32> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and binds loosest.
    fn parse_assignment(&mut self) -> Option<u32> {
        let lhs = self.parse_binary(1)?;
        if self.cursor.check(TokenKind::Equal)
            && !self.cursor.adjacent_pair(TokenKind::Equal, TokenKind::Equal)
        {
            let (line, col) = self.current_line_col();
            self.cursor.advance();
            let rhs = self.parse_assignment()?;
            return Some(
                self.ast
                    .exprs
                    .add_binary(lhs, BinaryOp::Assign, rhs, line, col),
            );
        }
        Some(lhs)
    }

    pub(crate) fn parse_binary(&mut self, min_prec: u8) -> Option<u32> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some((op, token_count)) = self.match_binary_op() else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            let (line, col) = self.current_line_col();
            for _ in 0..token_count {
                self.cursor.advance();
            }
            let rhs = self.parse_binary(prec + 1)?;
            lhs = self.ast.exprs.add_binary(lhs, op, rhs, line, col);
        }
        Some(lhs)
    }

    /// Match the binary operator at the cursor, if any.
    ///
    /// Returns `(op, token_count)` where `token_count` is 2 for
    /// synthesized compound operators.
    fn match_binary_op(&self) -> Option<(BinaryOp, usize)> {
        use TokenKind::*;
        let pair = |a, b| self.cursor.adjacent_pair(a, b);

        Some(match self.cursor.current_kind() {
            Star => (BinaryOp::Mul, 1),
            Slash => (BinaryOp::Div, 1),
            Percent => (BinaryOp::Mod, 1),
            Plus => (BinaryOp::Add, 1),
            Minus => (BinaryOp::Sub, 1),
            Caret => (BinaryOp::BitXor, 1),
            Less if pair(Less, Less) => (BinaryOp::Shl, 2),
            Less if pair(Less, Equal) => (BinaryOp::Le, 2),
            Less => (BinaryOp::Lt, 1),
            Greater if pair(Greater, Greater) => (BinaryOp::Shr, 2),
            Greater if pair(Greater, Equal) => (BinaryOp::Ge, 2),
            Greater => (BinaryOp::Gt, 1),
            Equal if pair(Equal, Equal) => (BinaryOp::Eq, 2),
            Bang if pair(Bang, Equal) => (BinaryOp::NotEq, 2),
            Ampersand if pair(Ampersand, Ampersand) => (BinaryOp::LogAnd, 2),
            Ampersand => (BinaryOp::BitAnd, 1),
            Pipe if pair(Pipe, Pipe) => (BinaryOp::LogOr, 2),
            Pipe => (BinaryOp::BitOr, 1),
            _ => return None,
        })
    }

    fn parse_unary(&mut self) -> Option<u32> {
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Ampersand => Some(UnaryOp::AddrOf),
            _ => None,
        };
        if let Some(op) = op {
            let (line, col) = self.current_line_col();
            self.cursor.advance();
            let operand = self.parse_unary()?;
            return Some(self.ast.exprs.add_unary(op, operand, line, col));
        }
        self.parse_postfix()
    }

    /// Postfix chains: calls, member access, indexing.
    fn parse_postfix(&mut self) -> Option<u32> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::LeftParen => {
                    let (line, col) = self.current_line_col();
                    self.cursor.advance();
                    let mut args = Vec::new();
                    if !self.cursor.check(TokenKind::RightParen) {
                        loop {
                            args.push(self.parse_expression()?);
                            if !self.cursor.eat(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(
                        TokenKind::RightParen,
                        DiagnosticCode::UnexpectedToken,
                        "Expected ')' to close argument list",
                        "Close the call with ')'",
                    )?;
                    expr = self.ast.exprs.add_call(expr, &args, line, col);
                }
                TokenKind::Dot => {
                    let (line, col) = self.current_line_col();
                    self.cursor.advance();
                    if !self.cursor.check(TokenKind::Identifier) {
                        self.error(
                            DiagnosticCode::UnexpectedToken,
                            "Expected member name after '.'",
                            "Provide a member name",
                        );
                        return None;
                    }
                    let name = self.current_text();
                    self.cursor.advance();
                    expr = self.ast.exprs.add_member(expr, name, line, col);
                }
                TokenKind::LeftBracket => {
                    let (line, col) = self.current_line_col();
                    self.cursor.advance();
                    let subscript = self.parse_expression()?;
                    self.expect(
                        TokenKind::RightBracket,
                        DiagnosticCode::UnexpectedToken,
                        "Expected ']' to close index expression",
                        "Close the index with ']'",
                    )?;
                    expr = self.ast.exprs.add_index(expr, subscript, line, col);
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        match self.cursor.current_kind() {
            kind @ (TokenKind::NumLiteral
            | TokenKind::StrLiteral
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null) => {
                let text = self.current_text();
                self.cursor.advance();
                Some(self.ast.exprs.add_literal(text, kind, line, col))
            }
            TokenKind::Identifier => {
                let name = self.current_text();
                self.cursor.advance();
                let symbol = self
                    .symbols
                    .lookup(name, self.current_scope)
                    .unwrap_or(INVALID_INDEX);
                Some(self.ast.exprs.add_variable(name, symbol, line, col))
            }
            TokenKind::LeftParen => {
                self.cursor.advance();
                let inner = self.parse_expression()?;
                self.expect(
                    TokenKind::RightParen,
                    DiagnosticCode::UnexpectedToken,
                    "Expected closing parenthesis ')'",
                    "Close the parenthesized expression with ')'",
                )?;
                Some(self.ast.exprs.add_grouping(inner, line, col))
            }
            _ => {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Invalid expression",
                    "Provide a valid literal or expression",
                );
                None
            }
        }
    }
}
