//! Declaration parsing: variables, functions, classes, enums, imports,
//! and generic parameter lists.

use crate::Parser;
use yu_diagnostic::{DiagnosticCode, DiagnosticSink};
use yu_ir::{StmtFlags, SymbolFlags, TokenKind, INVALID_INDEX};

/// Result of parsing a `<...>` generic parameter list.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GenericParams {
    /// Start of the parameter slice in `TypeList::generic_params`.
    pub start: u32,
    pub count: u32,
    pub has_variadic: bool,
}

impl<'src, S: DiagnosticSink> Parser<'src, S> {
    /// Parse one program-level declaration.
    pub(crate) fn parse_declaration(&mut self) -> Option<u32> {
        match self.cursor.current_kind() {
            TokenKind::Var | TokenKind::Const => self.parse_variable_decl(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::Class => self.parse_class_decl(),
            TokenKind::Enum => self.parse_enum_decl(),
            TokenKind::Import => self.parse_import_decl(),
            _ => {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Unexpected token in program",
                    "Remove or replace this token",
                );
                None
            }
        }
    }

    /// `(var|const) NAME (":" TYPE)? "=" EXPR ";"` — initialization is
    /// mandatory; a missing annotation is inferred from the initializer.
    pub(crate) fn parse_variable_decl(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        let is_const = self.cursor.eat(TokenKind::Const);
        if !is_const && !self.cursor.eat(TokenKind::Var) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected 'var' or 'const' at the start of variable declaration",
                "Use 'var' or 'const' when declaring a variable",
            );
            return None;
        }

        if !self.cursor.check(TokenKind::Identifier) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected identifier after 'var' or 'const'",
                "Provide a valid variable name",
            );
            return None;
        }
        let name = self.current_text();
        self.cursor.advance();

        let mut type_idx = INVALID_INDEX;
        if self.cursor.eat(TokenKind::Colon) {
            type_idx = self.parse_type()?;
        }

        if !self.cursor.eat(TokenKind::Equal) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected '=' for variable initialization",
                "Use '=' to assign a value to the variable",
            );
            return None;
        }

        let init = self.parse_expression()?;

        if type_idx == INVALID_INDEX {
            match self.infer_type(init) {
                Some(inferred) => type_idx = inferred,
                None => {
                    self.error(
                        DiagnosticCode::TypeMismatch,
                        "Unable to infer type for variable",
                        "Provide an explicit type annotation",
                    );
                    return None;
                }
            }
        }

        let stmt_flags = if is_const {
            StmtFlags::IS_CONST
        } else {
            StmtFlags::NONE
        };
        let sym_flags = if is_const {
            SymbolFlags::IS_CONST
        } else {
            SymbolFlags::NONE
        };
        let symbol = self.symbols.add(name, type_idx, self.current_scope, sym_flags);
        let stmt = self
            .ast
            .stmts
            .add_var_decl(name, type_idx, init, symbol, stmt_flags, line, col);

        if !self.cursor.eat(TokenKind::Semicolon) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected ';' at the end of variable declaration",
                "Add ';' to complete the variable declaration",
            );
            return None;
        }
        Some(stmt)
    }

    /// `"function" NAME ("<" GENERICS ">")? "(" PARAMS ")" "->" TYPE BLOCK`
    pub(crate) fn parse_function_decl(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `function`

        let mut generics = GenericParams::default();
        let has_generics = self.cursor.check(TokenKind::Less);
        let name_first = self.cursor.check(TokenKind::Identifier);
        // Generics may precede or follow the name; the reference grammar
        // puts them after the name.
        if has_generics && !name_first {
            generics = self.parse_generic_params()?;
        }

        if !self.cursor.check(TokenKind::Identifier) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected function name",
                "Provide a valid function name",
            );
            return None;
        }
        let name = self.current_text();
        self.cursor.advance();

        if self.cursor.check(TokenKind::Less) {
            generics = self.parse_generic_params()?;
        }

        let mut fn_flags = SymbolFlags::IS_FUNCTION;
        if generics.has_variadic {
            fn_flags = fn_flags.with(SymbolFlags::HAS_VARIADIC_GENERIC);
        }
        let func_symbol = self.symbols.add(name, INVALID_INDEX, self.current_scope, fn_flags);

        self.expect(
            TokenKind::LeftParen,
            DiagnosticCode::UnexpectedToken,
            "Expected '(' to start parameter list",
            "Open parameter list with '('",
        )?;

        let mut param_types = Vec::new();
        let mut param_symbols = Vec::new();
        while !self.cursor.check(TokenKind::RightParen) && !self.cursor.at_end() {
            let variadic = self.cursor.at_ellipsis();
            if variadic {
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
            }

            if !self.cursor.check(TokenKind::Identifier) {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected parameter name",
                    "Provide a valid parameter name",
                );
                return None;
            }
            let param_name = self.current_text();
            self.cursor.advance();

            self.expect(
                TokenKind::Colon,
                DiagnosticCode::UnexpectedToken,
                "Expected ':' after parameter name",
                "Provide type annotation for parameter",
            )?;

            let param_type = self.parse_type()?;
            let param_flags = if variadic {
                SymbolFlags::IS_VARIADIC
            } else {
                SymbolFlags::NONE
            };
            let param_symbol =
                self.symbols
                    .add(param_name, param_type, self.current_scope, param_flags);
            param_types.push(param_type);
            param_symbols.push(param_symbol);

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect(
            TokenKind::RightParen,
            DiagnosticCode::UnexpectedToken,
            "Expected ')' to close parameter list",
            "Close parameter list with ')'",
        )?;
        self.expect(
            TokenKind::Minus,
            DiagnosticCode::UnexpectedToken,
            "Expected '->' before return type",
            "Specify return type with '->'",
        )?;
        self.expect(
            TokenKind::Greater,
            DiagnosticCode::UnexpectedToken,
            "Expected '>' to complete return type arrow",
            "Complete return type specification with '->'",
        )?;

        let return_type = self.parse_type()?;
        self.symbols.type_indices[func_symbol as usize] = return_type;
        let fn_type = self.types.add_function(&param_types, return_type);

        if !self.cursor.check(TokenKind::LeftBrace) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected '{' to start function body",
                "Open function body with '{'",
            );
            return None;
        }
        let body = self.parse_block_statement()?;

        Some(self.ast.stmts.add_function(
            name,
            fn_type,
            &param_symbols,
            body,
            StmtFlags::NONE,
            line,
            col,
        ))
    }

    /// `"class" NAME ("<" GENERICS ">")? "final"? "{" MEMBERS "}"`
    ///
    /// Members are variable declarations and methods, each optionally
    /// prefixed with an access modifier and/or `static`.
    pub(crate) fn parse_class_decl(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `class`

        if !self.cursor.check(TokenKind::Identifier) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected class name",
                "Provide a valid class name",
            );
            return None;
        }
        let name = self.current_text();
        self.cursor.advance();

        self.symbols
            .add(name, INVALID_INDEX, self.current_scope, SymbolFlags::IS_TYPE);

        let generics = if self.cursor.check(TokenKind::Less) {
            self.parse_generic_params()?
        } else {
            GenericParams::default()
        };
        self.cursor.eat(TokenKind::Final);

        self.expect(
            TokenKind::LeftBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '{' to start class body",
            "Open class body with '{'",
        )?;

        self.current_scope += 1;
        let mut members = Vec::new();
        while !self.cursor.check(TokenKind::RightBrace) && !self.cursor.at_end() {
            let before = self.cursor.position();
            let mut flags = StmtFlags::NONE;
            loop {
                match self.cursor.current_kind() {
                    TokenKind::Public => {
                        flags = flags.with(StmtFlags::IS_PUBLIC);
                        self.cursor.advance();
                    }
                    TokenKind::Private | TokenKind::Protected => self.cursor.advance(),
                    TokenKind::Static => {
                        flags = flags.with(StmtFlags::IS_STATIC);
                        self.cursor.advance();
                    }
                    _ => break,
                }
            }

            let member = match self.cursor.current_kind() {
                TokenKind::Var | TokenKind::Const => self.parse_variable_decl(),
                TokenKind::Function => self.parse_function_decl(),
                _ => {
                    self.error(
                        DiagnosticCode::UnexpectedToken,
                        "Expected class member",
                        "Declare a field or method",
                    );
                    None
                }
            };

            match member {
                Some(stmt) => {
                    let existing = self.ast.stmts.flags[stmt as usize];
                    self.ast.stmts.flags[stmt as usize] = existing.with(flags);
                    members.push(stmt);
                }
                None => {
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
            "Expected '}' to close class body",
            "Close class body with '}'",
        )?;

        Some(self.ast.stmts.add_class(
            name,
            generics.start,
            generics.count,
            &members,
            StmtFlags::NONE,
            line,
            col,
        ))
    }

    /// `"enum" NAME "{" MEMBER ("=" EXPR)? ("," MEMBER ("=" EXPR)?)* "}" ";"?`
    pub(crate) fn parse_enum_decl(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `enum`

        if !self.cursor.check(TokenKind::Identifier) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected enum name",
                "Provide a valid enum name",
            );
            return None;
        }
        let name = self.current_text();
        self.cursor.advance();

        let enum_type = self.types.add_simple(name);
        self.symbols.add(
            name,
            enum_type,
            self.current_scope,
            SymbolFlags::IS_TYPE.with(SymbolFlags::IS_ENUM),
        );

        self.expect(
            TokenKind::LeftBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '{' to start enum body",
            "Open enum body with '{'",
        )?;

        let mut member_names = Vec::new();
        let mut member_inits = Vec::new();
        while !self.cursor.check(TokenKind::RightBrace) && !self.cursor.at_end() {
            if !self.cursor.check(TokenKind::Identifier) {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected enum member name",
                    "Provide a valid member name",
                );
                return None;
            }
            let member = self.current_text();
            self.cursor.advance();

            let init = if self.cursor.eat(TokenKind::Equal) {
                self.parse_expression()?
            } else {
                INVALID_INDEX
            };
            self.symbols.add(
                member,
                enum_type,
                self.current_scope,
                SymbolFlags::IS_ENUM_MEMBER,
            );
            member_names.push(member);
            member_inits.push(init);

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect(
            TokenKind::RightBrace,
            DiagnosticCode::UnexpectedToken,
            "Expected '}' to close enum body",
            "Close enum body with '}'",
        )?;
        self.cursor.eat(TokenKind::Semicolon);

        Some(
            self.ast
                .stmts
                .add_enum(name, &member_names, &member_inits, line, col),
        )
    }

    /// `"import" IDENT ("." IDENT)* ("as" IDENT)? ";"`
    pub(crate) fn parse_import_decl(&mut self) -> Option<u32> {
        let (line, col) = self.current_line_col();
        self.cursor.advance(); // `import`

        if !self.cursor.check(TokenKind::Identifier) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected module path after 'import'",
                "Provide a module path to import",
            );
            return None;
        }
        let path_start = self.cursor.current().start;
        let mut path_end = self.cursor.current().span().end;
        self.cursor.advance();

        while self.cursor.eat(TokenKind::Dot) {
            if !self.cursor.check(TokenKind::Identifier) {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected identifier after '.' in import path",
                    "Complete the module path",
                );
                return None;
            }
            path_end = self.cursor.current().span().end;
            self.cursor.advance();
        }

        let alias = if self.cursor.eat(TokenKind::As) {
            if !self.cursor.check(TokenKind::Identifier) {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected alias name after 'as'",
                    "Provide an alias identifier",
                );
                return None;
            }
            let alias = self.current_text();
            self.cursor.advance();
            Some(alias)
        } else {
            None
        };

        self.expect(
            TokenKind::Semicolon,
            DiagnosticCode::UnexpectedToken,
            "Expected ';' after import",
            "End the import with ';'",
        )?;

        let path = &self.lexer_source()[path_start as usize..path_end as usize];
        Some(self.ast.stmts.add_import(path, alias, line, col))
    }

    /// `"<" ("..."? IDENT) ("," "..."? IDENT)* ">"` — at most one variadic
    /// marker per list. Each parameter becomes a symbol flagged
    /// `IS_GENERIC_PARAM` and a type row usable inside the declaration.
    pub(crate) fn parse_generic_params(&mut self) -> Option<GenericParams> {
        self.expect(
            TokenKind::Less,
            DiagnosticCode::UnexpectedToken,
            "Expected '<' to start generic parameters",
            "Open generic parameters with '<'",
        )?;

        let start = self.types.generic_params.len() as u32;
        let mut count = 0u32;
        let mut has_variadic = false;

        while !self.cursor.check(TokenKind::Greater) && !self.cursor.at_end() {
            let variadic = self.cursor.at_ellipsis();
            if variadic {
                if has_variadic {
                    self.error(
                        DiagnosticCode::InvalidSyntax,
                        "Multiple variadic generic parameters",
                        "Only one variadic generic parameter is allowed",
                    );
                    return None;
                }
                has_variadic = true;
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
            }

            if !self.cursor.check(TokenKind::Identifier) {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected identifier in generic parameters",
                    "Provide a valid identifier for generic parameter",
                );
                return None;
            }
            let (param_line, param_col) = self.current_line_col();
            let param_name = self.current_text();
            self.cursor.advance();

            let mut flags = SymbolFlags::IS_GENERIC_PARAM;
            if variadic {
                flags = flags.with(SymbolFlags::IS_VARIADIC);
            }
            let type_row = self.types.add_simple(param_name);
            let symbol = self
                .symbols
                .add(param_name, type_row, self.current_scope, flags);
            self.types.generic_params.push(type_row);
            self.ast.exprs.add_generic_param(symbol, param_line, param_col);
            count += 1;

            if self.cursor.eat(TokenKind::Comma) {
                continue;
            }
            if !self.cursor.check(TokenKind::Greater) {
                self.error(
                    DiagnosticCode::UnexpectedToken,
                    "Expected ',' or '>' in generic parameters",
                    "Separate generic parameters with ',' or close with '>'",
                );
                return None;
            }
        }

        if !self.cursor.eat(TokenKind::Greater) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected '>' to close generic parameters",
                "Close generic parameters with '>'",
            );
            return None;
        }

        Some(GenericParams {
            start,
            count,
            has_variadic,
        })
    }
}
