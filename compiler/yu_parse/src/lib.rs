//! Recursive-descent parser for Yu.
//!
//! Consumes a [`TokenList`](yu_ir::TokenList) over a known source buffer
//! and produces a columnar [`Ast`] rooted at a single top-level block,
//! plus symbol and type tables and a list of diagnostics.
//!
//! # Error protocol
//!
//! On a syntax violation the parser emits a diagnostic through its
//! [`DiagnosticSink`], then synchronizes to the next statement boundary
//! and continues with the next statement. [`Parser::parse_program`]
//! returns `true` iff no error- or fatal-severity diagnostic was
//! recorded; the AST is populated either way so downstream tools can
//! keep inspecting it.

mod cursor;
mod grammar;
mod infer;
mod recovery;

pub use cursor::TokenCursor;
pub use recovery::{synchronize, TokenSet, STMT_BOUNDARY};

use tracing::debug;
use yu_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use yu_ir::ast::Ast;
use yu_ir::{SymbolList, Token, TokenFlags, TypeList};
use yu_lexer::Lexer;

/// Warning text for each lexical error flag.
const FLAG_MESSAGES: &[(TokenFlags, &str, &str)] = &[
    (
        TokenFlags::UNTERMINATED_STRING,
        "Unterminated string literal",
        "Close the string with '\"'",
    ),
    (
        TokenFlags::INVALID_ESCAPE_SEQUENCE,
        "Invalid escape sequence in string literal",
        "Use a supported escape such as \\n, \\t, or \\xNN",
    ),
    (
        TokenFlags::INVALID_DIGIT,
        "Invalid digit in number literal",
        "Use digits valid for the literal's base",
    ),
    (
        TokenFlags::MULTIPLE_DECIMAL_POINTS,
        "Number literal has multiple decimal points",
        "Keep a single '.' in the literal",
    ),
    (
        TokenFlags::INVALID_EXPONENT,
        "Invalid exponent in number literal",
        "Follow 'e' with an optional sign and digits",
    ),
    (
        TokenFlags::UNTERMINATED_BLOCK_COMMENT,
        "Unterminated block comment",
        "Close the comment with '*/'",
    ),
    (
        TokenFlags::INVALID_IDENTIFIER_START,
        "Invalid identifier start",
        "Identifiers start with a letter, '_', or '@'",
    ),
    (
        TokenFlags::INVALID_IDENTIFIER_CHAR,
        "Invalid character in identifier",
        "Identifiers contain letters, digits, and '_'",
    ),
];

/// Parser state for one compilation unit.
///
/// Borrows the lexer (tokens, source bytes, line table) and exclusively
/// owns the AST, symbol, and type tables it builds.
pub struct Parser<'src, S: DiagnosticSink> {
    lexer: &'src Lexer,
    file_name: &'src str,
    pub(crate) cursor: TokenCursor<'src>,
    sink: S,
    pub(crate) current_scope: u32,
    pub(crate) ast: Ast<'src>,
    pub(crate) types: TypeList<'src>,
    pub(crate) symbols: SymbolList<'src>,
    fatal: bool,
}

impl<'src, S: DiagnosticSink> Parser<'src, S> {
    /// Create a parser over a tokenized lexer.
    pub fn new(lexer: &'src Lexer, file_name: &'src str, sink: S) -> Self {
        Parser {
            lexer,
            file_name,
            cursor: TokenCursor::new(lexer.tokens()),
            sink,
            current_scope: 0,
            ast: Ast::default(),
            types: TypeList::with_primitives(),
            symbols: SymbolList::new(),
            fatal: false,
        }
    }

    /// Parse the whole program into a top-level block.
    ///
    /// Returns `true` iff no error or fatal diagnostic was recorded.
    pub fn parse_program(&mut self) -> bool {
        debug!(file = self.file_name, "parsing program");
        self.surface_lexical_flags();

        let mut top = Vec::new();
        while !self.cursor.at_end() && !self.fatal {
            let before = self.cursor.position();
            match self.parse_declaration() {
                Some(stmt) => top.push(stmt),
                None => {
                    // The error site already reported and synchronized;
                    // force progress if recovery stopped on this token.
                    if self.cursor.position() == before {
                        self.cursor.advance();
                    }
                }
            }
        }

        self.ast.root = self.ast.stmts.add_block(&top, 0, 1, 1);
        debug!(
            statements = top.len(),
            errors = self.sink.errors().len(),
            "parse finished"
        );
        !self.fatal && !self.sink.has_errors()
    }

    /// The parsed AST (valid even when parsing reported errors).
    pub fn ast(&self) -> &Ast<'src> {
        &self.ast
    }

    /// The accumulated type table.
    pub fn types(&self) -> &TypeList<'src> {
        &self.types
    }

    /// The accumulated symbol table.
    pub fn symbols(&self) -> &SymbolList<'src> {
        &self.symbols
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[Diagnostic] {
        self.sink.warnings()
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[Diagnostic] {
        self.sink.errors()
    }

    // --- Internal helpers shared by the grammar modules ---

    /// Text of the current token, borrowed from the source buffer.
    pub(crate) fn current_text(&self) -> &'src str {
        self.lexer.get_token_value(self.cursor.current())
    }

    /// Full source text, borrowed from the lexer's buffer.
    pub(crate) fn lexer_source(&self) -> &'src str {
        self.lexer.source()
    }

    /// 1-based line/column of the current token.
    pub(crate) fn current_line_col(&self) -> (u32, u32) {
        self.lexer.get_line_col(self.cursor.current())
    }

    /// Report a diagnostic anchored at `token`.
    fn diagnose(
        &mut self,
        token: Token,
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        help: &str,
    ) {
        let lexer = self.lexer;
        let (line, col) = lexer.get_line_col(token);
        let diag = Diagnostic::new(severity, code, message, self.file_name, line, col)
            .with_source_line(lexer.source_line(line), (token.length as u32).max(1))
            .with_help(help);
        if severity == Severity::Fatal {
            self.fatal = true;
        }
        self.sink.report(diag);
    }

    /// Report an error at the current token and synchronize to the next
    /// statement boundary.
    pub(crate) fn error(&mut self, code: DiagnosticCode, message: &str, help: &str) {
        let token = self.cursor.current();
        self.diagnose(token, Severity::Error, code, message, help);
        recovery::synchronize(&mut self.cursor);
    }

    /// Consume a token of the given kind or report an error.
    pub(crate) fn expect(
        &mut self,
        kind: yu_ir::TokenKind,
        code: DiagnosticCode,
        message: &str,
        help: &str,
    ) -> Option<Token> {
        if self.cursor.check(kind) {
            let token = self.cursor.current();
            self.cursor.advance();
            Some(token)
        } else {
            self.error(code, message, help);
            None
        }
    }

    /// Surface lexical error flags as warnings.
    ///
    /// Flagged tokens are structurally benign for the parser (the lexer
    /// already resynchronized), so they warn rather than error.
    fn surface_lexical_flags(&mut self) {
        let lexer = self.lexer;
        for token in lexer.tokens().iter() {
            if token.flags.is_empty() {
                continue;
            }
            for &(flag, message, help) in FLAG_MESSAGES {
                if token.flags.contains(flag) {
                    self.diagnose(token, Severity::Warning, DiagnosticCode::Other, message, help);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yu_diagnostic::CollectingSink;
    use yu_ir::ast::{PRIM_F64, PRIM_I32, PRIM_I64, PRIM_STRING};
    use yu_ir::{NodeType, StmtFlags, SymbolFlags, INVALID_INDEX};

    // The parser borrows the local lexer, so tests run their assertions
    // inside this driver instead of returning the parser.
    fn with_parser<R>(source: &str, f: impl FnOnce(bool, &Parser<'_, CollectingSink>) -> R) -> R {
        let mut lexer = Lexer::new(source);
        lexer.tokenize();
        let mut parser = Parser::new(&lexer, "test.yu", CollectingSink::new());
        let ok = parser.parse_program();
        f(ok, &parser)
    }

    // === Variable declarations & inference (S4) ===

    #[test]
    fn var_decl_type_inference() {
        let source = "var x = 42;\nvar y = \"hi\";\nvar z = 1.5;";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());

            let root = parser.ast().root;
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.block_stmts(root).len(), 3);

            assert_eq!(stmts.var_type_indices, vec![PRIM_I32, PRIM_STRING, PRIM_F64]);

            let symbols = parser.symbols();
            assert_eq!(symbols.len(), 3);
            assert_eq!(symbols.names, vec!["x", "y", "z"]);
            assert_eq!(symbols.scopes, vec![0, 0, 0]);
            assert_eq!(
                symbols.type_indices,
                vec![PRIM_I32, PRIM_STRING, PRIM_F64]
            );
        });
    }

    #[test]
    fn large_int_literal_widens_to_i64() {
        with_parser("var big = 3000000000;", |ok, parser| {
            assert!(ok);
            assert_eq!(parser.ast().stmts.var_type_indices, vec![PRIM_I64]);
        });
    }

    #[test]
    fn identifier_initializer_inherits_type() {
        with_parser("var a = 1.5; var b = a;", |ok, parser| {
            assert!(ok);
            assert_eq!(parser.ast().stmts.var_type_indices, vec![PRIM_F64, PRIM_F64]);
        });
    }

    #[test]
    fn boolean_literals_infer_bool() {
        with_parser("var t = true; var f = false;", |ok, parser| {
            assert!(ok);
            assert_eq!(
                parser.ast().stmts.var_type_indices,
                vec![yu_ir::ast::PRIM_BOOL, yu_ir::ast::PRIM_BOOL]
            );
        });
    }

    #[test]
    fn uninferable_initializer_reports_type_mismatch() {
        with_parser("var x = undefined_name;", |ok, parser| {
            assert!(!ok);
            assert_eq!(parser.errors().len(), 1);
            assert_eq!(parser.errors()[0].code, DiagnosticCode::TypeMismatch);
        });
    }

    #[test]
    fn const_decl_sets_flags() {
        with_parser("const k: i32 = 9;", |ok, parser| {
            assert!(ok);
            let stmts = &parser.ast().stmts;
            let decl = stmts.block_stmts(parser.ast().root)[0] as usize;
            assert!(stmts.flags[decl].contains(StmtFlags::IS_CONST));
            assert!(parser.symbols().flags[0].contains(SymbolFlags::IS_CONST));
        });
    }

    // === Error recovery (S5) ===

    #[test]
    fn recovery_after_bad_initializer() {
        with_parser("var x = ; var y = 42;", |ok, parser| {
            assert!(!ok);
            assert_eq!(parser.errors().len(), 1);
            let code = parser.errors()[0].code;
            assert!(
                code == DiagnosticCode::UnexpectedToken || code == DiagnosticCode::InvalidSyntax,
                "unexpected code {code:?}"
            );

            // The second declaration parsed fine as an i32 var.
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.var_names, vec!["y"]);
            assert_eq!(stmts.var_type_indices, vec![PRIM_I32]);
        });
    }

    #[test]
    fn missing_semicolon_recovers_at_next_statement() {
        with_parser("var x = 1\nvar y = 2;", |ok, parser| {
            assert!(!ok);
            // `var` is a statement boundary: recovery resumes there and
            // the second declaration still parses.
            assert!(parser.ast().stmts.var_names.contains(&"y"));
        });
    }

    #[test]
    fn ast_is_returned_even_on_failure() {
        with_parser("var x = ;", |ok, parser| {
            assert!(!ok);
            // Root block exists with no statements.
            let root = parser.ast().root;
            assert_eq!(parser.ast().stmts.block_stmts(root).len(), 0);
        });
    }

    // === Functions ===

    #[test]
    fn function_decl_records_signature() {
        let source = "function add(a: i32, b: i32) -> i32 { return a + b; }";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.func_names, vec!["add"]);
            assert_eq!(stmts.param_list_lengths, vec![2]);

            let fn_type = stmts.func_type_indices[0];
            assert_eq!(parser.types().function_return_type(fn_type), Some(PRIM_I32));

            // Function symbol carries IS_FUNCTION and the return type.
            let sym = parser.symbols().lookup("add", 0).unwrap() as usize;
            assert!(parser.symbols().flags[sym].contains(SymbolFlags::IS_FUNCTION));
            assert_eq!(parser.symbols().type_indices[sym], PRIM_I32);
        });
    }

    #[test]
    fn function_generics_and_variadic_marker() {
        let source = "function pack<T, ...Rest>(head: T) -> void { return; }";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let symbols = parser.symbols();
            let t = symbols.lookup("T", 0).unwrap() as usize;
            let rest = symbols.lookup("Rest", 0).unwrap() as usize;
            assert!(symbols.flags[t].contains(SymbolFlags::IS_GENERIC_PARAM));
            assert!(symbols.flags[rest].contains(SymbolFlags::IS_GENERIC_PARAM));
            assert!(symbols.flags[rest].contains(SymbolFlags::IS_VARIADIC));

            let f = symbols.lookup("pack", 0).unwrap() as usize;
            assert!(symbols.flags[f].contains(SymbolFlags::HAS_VARIADIC_GENERIC));
        });
    }

    #[test]
    fn second_variadic_generic_is_rejected() {
        let source = "function bad<...A, ...B>(x: i32) -> void { return; }";
        with_parser(source, |ok, parser| {
            assert!(!ok);
            assert!(parser
                .errors()
                .iter()
                .any(|e| e.code == DiagnosticCode::InvalidSyntax));
        });
    }

    #[test]
    fn missing_arrow_reports_error() {
        with_parser("function f() i32 { return 1; }", |ok, parser| {
            assert!(!ok);
            assert!(parser.errors()[0].message.contains("return type"));
        });
    }

    // === Types & generics ===

    #[test]
    fn nested_generic_type_closes_with_individual_greater_tokens() {
        let source = "\
class Vector3<T> { }
class Array<T> { }
function f<T>(matrix: Array<Array<Vector3<T>>>) -> void { return; }";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            // The parameter type is an Array row whose argument is another
            // Array row wrapping a Vector3 row.
            let types = parser.types();
            let param = parser.types().function_params[0];
            assert_eq!(types.names[param as usize], "Array");
            let inner = types.generic_args(param)[0];
            assert_eq!(types.names[inner as usize], "Array");
            let innermost = types.generic_args(inner)[0];
            assert_eq!(types.names[innermost as usize], "Vector3");
            assert_eq!(types.generic_counts[innermost as usize], 1);
        });
    }

    #[test]
    fn ptr_type_with_argument() {
        with_parser(
            "function g(p: Ptr<i32>) -> void { return; }",
            |ok, parser| {
                assert!(ok, "errors: {:?}", parser.errors());
                let types = parser.types();
                // A Ptr row with one argument was appended after the
                // seeded primitives (which carry no arguments).
                let row = (0..types.len() as u32)
                    .find(|&i| {
                        types.names[i as usize] == "Ptr" && types.generic_counts[i as usize] == 1
                    })
                    .unwrap();
                assert_eq!(types.generic_args(row), &[PRIM_I32]);
            },
        );
    }

    #[test]
    fn unknown_type_reports_unresolved_symbol() {
        with_parser("var x: Widget = 1;", |ok, parser| {
            assert!(!ok);
            assert_eq!(parser.errors()[0].code, DiagnosticCode::UnresolvedSymbol);
        });
    }

    // === Statements ===

    #[test]
    fn if_else_while_for_parse() {
        let source = "\
function loops(n: i32) -> i32 {
    var total = 0;
    if (n) { total = 1; } else { total = 2; }
    while (n) { n = n - 1; }
    for (var i = 0; i; i = i - 1) { total = total + i; }
    return total;
}";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.condition_indices.len(), 1); // one if
            assert_eq!(stmts.while_cond_indices.len(), 1);
            assert_eq!(stmts.for_init_indices.len(), 1);
            // The else branch is present.
            assert_ne!(stmts.else_stmt_indices[0], INVALID_INDEX);
        });
    }

    #[test]
    fn switch_with_cases_and_default() {
        let source = "\
function pick(n: i32) -> i32 {
    switch (n) {
        case 1: return 10;
        case 2: return 20;
        default: return 0;
    }
}";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.switch_value_indices.len(), 1);
            assert_eq!(stmts.case_list_lengths, vec![3]);
            // Default case has no value.
            assert_eq!(stmts.case_value_indices[2], INVALID_INDEX);
        });
    }

    #[test]
    fn break_and_continue() {
        let source = "function f(n: i32) -> void { while (n) { break; } while (n) { continue; } return; }";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let kinds = &parser.ast().stmts.kinds;
            assert!(kinds.contains(&NodeType::Break));
            assert!(kinds.contains(&NodeType::Continue));
        });
    }

    // === Symbol shadowing ===

    #[test]
    fn inner_scope_shadows_outer() {
        let source = "\
function f() -> void {
    var x = 1;
    {
        var x = \"inner\";
        var y = x;
    }
    return;
}";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            // `y` picked up the inner (string) binding of x.
            let stmts = &parser.ast().stmts;
            let y = stmts.var_names.iter().position(|&n| n == "y").unwrap();
            assert_eq!(stmts.var_type_indices[y], PRIM_STRING);
        });
    }

    // === Classes, enums, imports ===

    #[test]
    fn class_with_members() {
        let source = "\
class Point<T> {
    var x = 0;
    var y = 0;
    public static function origin() -> i32 { return 0; }
}";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.class_names, vec!["Point"]);
            assert_eq!(stmts.class_member_lengths, vec![3]);
            assert_eq!(stmts.class_generic_counts, vec![1]);

            // Modifier flags landed on the method.
            let method = stmts
                .kinds
                .iter()
                .position(|&k| k == NodeType::FunctionDecl)
                .unwrap();
            assert!(stmts.flags[method].contains(StmtFlags::IS_PUBLIC));
            assert!(stmts.flags[method].contains(StmtFlags::IS_STATIC));

            let sym = parser.symbols().lookup("Point", 0).unwrap() as usize;
            assert!(parser.symbols().flags[sym].contains(SymbolFlags::IS_TYPE));
        });
    }

    #[test]
    fn enum_members_get_flags() {
        let source = "enum Color { Red, Green = 2, Blue }";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.enum_names, vec!["Color"]);
            assert_eq!(
                stmts.enum_member_names,
                vec!["Red", "Green", "Blue"]
            );
            assert_eq!(stmts.enum_member_inits[0], INVALID_INDEX);
            assert_ne!(stmts.enum_member_inits[1], INVALID_INDEX);

            let symbols = parser.symbols();
            let color = symbols.lookup("Color", 0).unwrap() as usize;
            assert!(symbols.flags[color].contains(SymbolFlags::IS_ENUM));
            let green = symbols.lookup("Green", 0).unwrap() as usize;
            assert!(symbols.flags[green].contains(SymbolFlags::IS_ENUM_MEMBER));
        });
    }

    #[test]
    fn import_with_alias() {
        with_parser("import core.mem as memory;", |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let stmts = &parser.ast().stmts;
            assert_eq!(stmts.import_paths, vec!["core.mem"]);
            assert_eq!(stmts.import_aliases, vec![Some("memory")]);
        });
    }

    // === Expressions ===

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        with_parser("var x = 1 + 2 * 3;", |ok, parser| {
            assert!(ok);
            let exprs = &parser.ast().exprs;
            // Top binary is Add; its right child is the Mul.
            let top = parser.ast().stmts.initializer_indices[0] as usize;
            assert_eq!(exprs.kinds[top], NodeType::Binary);
            let data = exprs.data_indices[top] as usize;
            assert_eq!(exprs.operators[data], yu_ir::BinaryOp::Add);
            let right = exprs.right_expr_indices[data] as usize;
            let rdata = exprs.data_indices[right] as usize;
            assert_eq!(exprs.operators[rdata], yu_ir::BinaryOp::Mul);
        });
    }

    #[test]
    fn bitwise_ladder_and_xor_or() {
        // a & b ^ c | d parses as ((a & b) ^ c) | d.
        let source = "var a = 1; var b = 2; var c = 3; var d = 4; var x = a & b ^ c | d;";
        with_parser(source, |ok, parser| {
            assert!(ok);
            let exprs = &parser.ast().exprs;
            let top = *parser.ast().stmts.initializer_indices.last().unwrap() as usize;
            let data = exprs.data_indices[top] as usize;
            assert_eq!(exprs.operators[data], yu_ir::BinaryOp::BitOr);
        });
    }

    #[test]
    fn shift_right_synthesized_from_adjacent_greater() {
        with_parser("var a = 1; var x = a >> 2;", |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let exprs = &parser.ast().exprs;
            assert!(exprs.operators.contains(&yu_ir::BinaryOp::Shr));
        });
    }

    #[test]
    fn comparison_and_equality_operators() {
        let source = "var a = 1; var x = a < 2; var y = a >= 2; var z = a == 2; var w = a != 2;";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let ops = &parser.ast().exprs.operators;
            for op in [
                yu_ir::BinaryOp::Lt,
                yu_ir::BinaryOp::Ge,
                yu_ir::BinaryOp::Eq,
                yu_ir::BinaryOp::NotEq,
            ] {
                assert!(ops.contains(&op), "missing {op:?}");
            }
        });
    }

    #[test]
    fn unary_and_postfix_chains() {
        let source = "function f(p: i32) -> i32 { return -p; }\nvar a = 5;\nvar x = f(a);\nvar y = ~a;";
        with_parser(source, |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            let exprs = &parser.ast().exprs;
            assert!(exprs.kinds.contains(&NodeType::FunctionCall));
            assert!(exprs.unary_operators.contains(&yu_ir::UnaryOp::Neg));
            assert!(exprs.unary_operators.contains(&yu_ir::UnaryOp::BitNot));
        });
    }

    #[test]
    fn member_and_index_expressions() {
        let source = "var a = 1; var x = a.field; var y = a[0];";
        with_parser(source, |_, parser| {
            let exprs = &parser.ast().exprs;
            assert!(exprs.kinds.contains(&NodeType::Member));
            assert!(exprs.kinds.contains(&NodeType::Index));
            assert_eq!(exprs.member_names, vec!["field"]);
        });
    }

    // === Lexical flag surfacing ===

    #[test]
    fn flagged_tokens_surface_as_warnings() {
        with_parser("var s = \"abc\\q\";", |ok, parser| {
            assert!(ok, "errors: {:?}", parser.errors());
            assert_eq!(parser.warnings().len(), 1);
            assert!(parser.warnings()[0]
                .message
                .contains("Invalid escape sequence"));
        });
    }
}
