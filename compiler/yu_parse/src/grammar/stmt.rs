//! Statement parsing.

use crate::Parser;
use yu_diagnostic::{DiagnosticCode, DiagnosticSink};
use yu_ir::{TokenKind, INVALID_INDEX};

impl<'src, S: DiagnosticSink> Parser<'src, S> {
    pub(crate) fn parse_statement(&mut self) -> Option<u32> {
        match self.cursor.current_kind() {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::LeftBrace => self.parse_block_statement(),
            TokenKind::Var | TokenKind::Const => self.parse_variable_decl(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::Break => {
                let (line, col) = self.current_line_col();
                self.cursor.advance();
                self.expect(
                    TokenKind::Semicolon,
                    DiagnosticCode::UnexpectedToken,
                    "Expected ';' after 'break'",
                    "End the statement with ';'",
                )?;
                Some(self.ast.stmts.add_break(line, col))
            }
            TokenKind::Continue => {
                let (line, col) = self.current_line_col();
                self.cursor.advance();
                self.expect(
                    TokenKind::Semicolon,
                    DiagnosticCode::UnexpectedToken,
                    "Expected ';' after 'continue'",
                    "End the statement with ';'",
                )?;
                Some(self.ast.stmts.add_continue(line, col))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_if_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `if`

        self.expect(
            TokenKind::LeftParen,
            DiagnosticCode::UnexpectedToken,
            "Expected '(' after 'if'",
            "Open condition with '('",
        )?;
        let cond = self.parse_expression()?;
        self.expect(
            TokenKind::RightParen,
            DiagnosticCode::UnexpectedToken,
            "Expected ')' after condition",
            "Close condition with ')'",
        )?;

        let then_stmt = self.parse_statement()?;
        let else_stmt = if self.cursor.eat(TokenKind::Else) {
            self.parse_statement()?
        } else {
            INVALID_INDEX
        };

        Some(self.ast.stmts.add_if(cond, then_stmt, else_stmt, line, col))
    }

    fn parse_while_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `while`

        self.expect(
            TokenKind::LeftParen,
            DiagnosticCode::UnexpectedToken,
            "Expected '(' after 'while'",
            "Open condition with '('",
        )?;
        let cond = self.parse_expression()?;
        self.expect(
            TokenKind::RightParen,
            DiagnosticCode::UnexpectedToken,
            "Expected ')' after condition",
            "Close condition with ')'",
        )?;
        let body = self.parse_statement()?;

        Some(self.ast.stmts.add_while(cond, body, line, col))
    }

    /// C-style `for (init; cond; update) body`; every clause is optional.
    ///
    /// `init` is a statement index (variable declaration or expression
    /// statement); `cond` and `update` are expression indices.
    fn parse_for_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `for`

        self.expect(
            TokenKind::LeftParen,
            DiagnosticCode::UnexpectedToken,
            "Expected '(' after 'for'",
            "Open loop clauses with '('",
        )?;

        let init = match self.cursor.current_kind() {
            TokenKind::Semicolon => {
                self.cursor.advance();
                INVALID_INDEX
            }
            TokenKind::Var | TokenKind::Const => self.parse_variable_decl()?,
            _ => {
                let (eline, ecol) = self.current_line_col();
                let expr = self.parse_expression()?;
                self.expect(
                    TokenKind::Semicolon,
                    DiagnosticCode::UnexpectedToken,
                    "Expected ';' after loop initializer",
                    "Separate loop clauses with ';'",
                )?;
                self.ast.stmts.add_expression_stmt(expr, eline, ecol)
            }
        };

        let cond = if self.cursor.check(TokenKind::Semicolon) {
            INVALID_INDEX
        } else {
            self.parse_expression()?
        };
        self.expect(
            TokenKind::Semicolon,
            DiagnosticCode::UnexpectedToken,
            "Expected ';' after loop condition",
            "Separate loop clauses with ';'",
        )?;

        let update = if self.cursor.check(TokenKind::RightParen) {
            INVALID_INDEX
        } else {
            self.parse_expression()?
        };
        self.expect(
            TokenKind::RightParen,
            DiagnosticCode::UnexpectedToken,
            "Expected ')' after loop clauses",
            "Close loop clauses with ')'",
        )?;

        let body = self.parse_statement()?;
        Some(self.ast.stmts.add_for(init, cond, update, body, line, col))
    }

    /// `{ statement* }` — each block opens a fresh lexical scope.
    pub(crate) fn parse_block_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.expect(
            TokenKind::LeftBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '{' to start block",
            "Open the block with '{'",
        )?;

        self.current_scope += 1;
        let scope = self.current_scope;
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RightBrace) && !self.cursor.at_end() {
            let before = self.cursor.position();
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    // Recovery may stop on a boundary token this loop
                    // cannot consume; force progress.
                    if self.cursor.position() == before {
                        self.cursor.advance();
                    }
                }
            }
        }
        self.current_scope -= 1;

        self.expect(
            TokenKind::RightBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '}' to close block",
            "Close the block with '}'",
        )?;

        Some(self.ast.stmts.add_block(&stmts, scope, line, col))
    }

    fn parse_return_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `return`

        let value = if self.cursor.check(TokenKind::Semicolon) {
            INVALID_INDEX
        } else {
            self.parse_expression()?
        };
        self.expect(
            TokenKind::Semicolon,
            DiagnosticCode::UnexpectedToken,
            "Expected ';' after return statement",
            "End return statement with ';'",
        )?;

        Some(self.ast.stmts.add_return(value, line, col))
    }

    /// `switch (EXPR) { (case EXPR: stmts | default: stmts)* }`
    fn parse_switch_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `switch`

        self.expect(
            TokenKind::LeftParen,
            DiagnosticCode::UnexpectedToken,
            "Expected '(' after 'switch'",
            "Open the scrutinee with '('",
        )?;
        let value = self.parse_expression()?;
        self.expect(
            TokenKind::RightParen,
            DiagnosticCode::UnexpectedToken,
            "Expected ')' after switch value",
            "Close the scrutinee with ')'",
        )?;
        self.expect(
            TokenKind::LeftBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '{' to start switch body",
            "Open switch body with '{'",
        )?;

        let mut case_values = Vec::new();
        let mut case_bodies = Vec::new();
        while !self.cursor.check(TokenKind::RightBrace) && !self.cursor.at_end() {
            let case_value = if self.cursor.eat(TokenKind::Case) {
                let value = self.parse_expression()?;
                self.expect(
                    TokenKind::Colon,
                    DiagnosticCode::UnexpectedToken,
                    "Expected ':' after case value",
                    "Follow the case value with ':'",
                )?;
                value
            } else if self.cursor.eat(TokenKind::Default) {
                self.expect(
                    TokenKind::Colon,
                    DiagnosticCode::UnexpectedToken,
                    "Expected ':' after 'default'",
                    "Follow 'default' with ':'",
                )?;
                INVALID_INDEX
            } else {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected 'case' or 'default' in switch body",
                    "Label switch arms with 'case' or 'default'",
                );
                return None;
            };

            case_values.push(case_value);
            case_bodies.push(self.parse_case_body()?);
        }

        self.expect(
            TokenKind::RightBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '}' to close switch body",
            "Close switch body with '}'",
        )?;

        Some(
            self.ast
                .stmts
                .add_switch(value, &case_values, &case_bodies, line, col),
        )
    }

    /// Statements of one switch arm, up to the next label or `}`.
    fn parse_case_body(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        let mut stmts = Vec::new();
        loop {
            match self.cursor.current_kind() {
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof => {
                    break
                }
                _ => {
                    let before = self.cursor.position();
                    match self.parse_statement() {
                        Some(stmt) => stmts.push(stmt),
                        None => {
                            if self.cursor.position() == before {
                                self.cursor.advance();
                            }
                        }
                    }
                }
            }
        }
        Some(self.ast.stmts.add_block(&stmts, self.current_scope, line, col))
    }

    fn parse_expression_statement(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        let expr = self.parse_expression()?;
        self.expect(
            TokenKind::Semicolon,
            DiagnosticCode::UnexpectedToken,
            "Expected ';' after expression",
            "End expression statement with ';'",
        )?;
        Some(self.ast.stmts.add_expression_stmt(expr, line, col))
    }
}
