//! Type inference for un-annotated variable declarations.
//!
//! The inferred type comes from the shape of the initializer: string
//! literals are `string`, boolean/null literals are `boolean`, numeric
//! literals split on fractional/exponent syntax, and identifiers take
//! the type of the symbol they reference.

use crate::Parser;
use yu_diagnostic::DiagnosticSink;
use yu_ir::ast::{PRIM_BOOL, PRIM_F64, PRIM_I32, PRIM_I64, PRIM_STRING};
use yu_ir::{BinaryOp, NodeType, TokenKind, INVALID_INDEX};

impl<'src, S: DiagnosticSink> Parser<'src, S> {
    /// Infer a type index for `expr`, or `None` when the initializer's
    /// shape does not determine one.
    pub(crate) fn infer_type(&self, expr: u32) -> Option<u32> {
        let e = expr as usize;
        let data = self.ast.exprs.data_indices[e] as usize;

        match self.ast.exprs.kinds[e] {
            NodeType::Literal => match self.ast.exprs.literal_kinds[data] {
                TokenKind::StrLiteral => Some(PRIM_STRING),
                TokenKind::True | TokenKind::False | TokenKind::Null => Some(PRIM_BOOL),
                TokenKind::NumLiteral => {
                    Some(infer_number(self.ast.exprs.literal_values[data]))
                }
                _ => None,
            },
            NodeType::Variable => {
                let symbol = self.ast.exprs.symbol_indices[data];
                let symbol = if symbol != INVALID_INDEX {
                    Some(symbol)
                } else {
                    self.symbols
                        .lookup(self.ast.exprs.var_names[data], self.current_scope)
                };
                symbol.and_then(|s| {
                    let ty = self.symbols.type_indices[s as usize];
                    (ty != INVALID_INDEX).then_some(ty)
                })
            }
            NodeType::FunctionCall => {
                // A direct call takes the callee symbol's recorded type
                // (the function's return type).
                let callee = self.ast.exprs.callee_indices[data];
                self.infer_type(callee)
            }
            NodeType::Binary => match self.ast.exprs.operators[data] {
                BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::LogAnd
                | BinaryOp::LogOr => Some(PRIM_BOOL),
                // Arithmetic and bitwise results take the shape of an
                // operand; try the left side first.
                _ => self
                    .infer_type(self.ast.exprs.left_expr_indices[data])
                    .or_else(|| self.infer_type(self.ast.exprs.right_expr_indices[data])),
            },
            NodeType::Grouping => self.infer_type(self.ast.exprs.grouped_expr_indices[data]),
            NodeType::Unary => self.infer_type(self.ast.exprs.operand_indices[data]),
            _ => None,
        }
    }
}

/// Numeric literal inference: fractional or exponent syntax means `f64`;
/// otherwise `i32`, widened to `i64` when the value exceeds `i32::MAX`.
fn infer_number(text: &str) -> u32 {
    if let Some(digits) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        return integer_width(u64::from_str_radix(digits, 16));
    }
    if let Some(digits) = text
        .strip_prefix("0b")
        .or_else(|| text.strip_prefix("0B"))
    {
        return integer_width(u64::from_str_radix(digits, 2));
    }
    if text.contains('.') || text.contains(['e', 'E']) {
        return PRIM_F64;
    }
    integer_width(text.parse::<u64>())
}

fn integer_width(value: Result<u64, std::num::ParseIntError>) -> u32 {
    match value {
        Ok(v) if v <= i32::MAX as u64 => PRIM_I32,
        // Parse failures only happen for out-of-range or flagged
        // literals; treat both as wide.
        _ => PRIM_I64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_shapes() {
        assert_eq!(infer_number("42"), PRIM_I32);
        assert_eq!(infer_number("1.5"), PRIM_F64);
        assert_eq!(infer_number("1e9"), PRIM_F64);
        assert_eq!(infer_number("1.23e-4"), PRIM_F64);
        assert_eq!(infer_number("2147483647"), PRIM_I32);
        assert_eq!(infer_number("2147483648"), PRIM_I64);
        assert_eq!(infer_number("0xFF"), PRIM_I32);
        assert_eq!(infer_number("0xFFFFFFFFFF"), PRIM_I64);
        assert_eq!(infer_number("0b1010"), PRIM_I32);
    }
}
