//! Type expression parsing.
//!
//! Primitive names resolve to the pre-seeded type rows; `Ptr<T>`, user
//! identifiers, and generic applications `Ident<TypeList>` append rows.
//! Nested generic arguments close with consecutive single `>` tokens;
//! the lexer never merges them.

use crate::Parser;
use yu_diagnostic::{DiagnosticCode, DiagnosticSink};
use yu_ir::ast::{primitive_type_index, PRIM_PTR};
use yu_ir::{SymbolFlags, TokenKind, INVALID_INDEX};

impl<'src, S: DiagnosticSink> Parser<'src, S> {
    pub(crate) fn parse_type(&mut self) -> Option<u32> {
        let kind = self.cursor.current_kind();

        if kind == TokenKind::Ptr {
            return self.parse_ptr_type();
        }
        if let Some(primitive) = primitive_type_index(kind) {
            self.cursor.advance();
            return Some(primitive);
        }
        if kind == TokenKind::Identifier {
            return self.parse_named_type();
        }

        self.error(
            DiagnosticCode::UnresolvedSymbol,
            "Unrecognized type",
            "Use a valid type or define the type before use",
        );
        None
    }

    /// `Ptr` or `Ptr<T, ...>`.
    fn parse_ptr_type(&mut self) -> Option<u32> {
        self.cursor.advance(); // `Ptr`
        if self.cursor.eat(TokenKind::Less) {
            let args = self.parse_type_args()?;
            Some(self.types.add_generic("Ptr", &args))
        } else {
            Some(PRIM_PTR)
        }
    }

    /// A user identifier: a visible generic parameter, a declared type
    /// name, or a generic application of one.
    fn parse_named_type(&mut self) -> Option<u32> {
        let name = self.current_text();
        let symbol = self.symbols.lookup(name, self.current_scope);
        let known_type = symbol.is_some_and(|s| {
            let flags = self.symbols.flags[s as usize];
            flags.contains(SymbolFlags::IS_GENERIC_PARAM) || flags.contains(SymbolFlags::IS_TYPE)
        });
        if !known_type {
            self.error(
                DiagnosticCode::UnresolvedSymbol,
                "Unrecognized type",
                "Use a valid type or define the type before use",
            );
            return None;
        }
        self.cursor.advance();

        if self.cursor.eat(TokenKind::Less) {
            let args = self.parse_type_args()?;
            return Some(self.types.add_generic(name, &args));
        }

        // Reuse the row created at declaration when there is one.
        let row = self.symbols.type_indices[symbol.unwrap() as usize];
        Some(if row != INVALID_INDEX {
            row
        } else {
            self.types.add_simple(name)
        })
    }

    /// Comma-separated type arguments, closed by a single `>`.
    fn parse_type_args(&mut self) -> Option<Vec<u32>> {
        let mut args = vec![self.parse_type()?];
        while self.cursor.eat(TokenKind::Comma) {
            args.push(self.parse_type()?);
        }
        if !self.cursor.eat(TokenKind::Greater) {
            self.error(
                DiagnosticCode::UnexpectedToken,
                "Expected '>' to close generic type parameters",
                "Close generic type parameters with '>'",
            );
            return None;
        }
        Some(args)
    }
}
