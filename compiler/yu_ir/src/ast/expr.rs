//! Columnar expression storage.

use super::{BinaryOp, ExprFlags, NodeType, UnaryOp};
use crate::{TokenKind, INVALID_INDEX};

/// Columnar expression table.
///
/// Common columns (`kinds`, `lines`, `columns`, `type_indices`, `flags`,
/// `data_indices`) have one row per expression. Kind-specific columns have
/// one row per expression of that kind, in append order; `data_indices`
/// maps an expression to its row in its kind family.
#[derive(Debug, Default)]
pub struct ExprList<'src> {
    pub kinds: Vec<NodeType>,
    pub lines: Vec<u32>,
    pub columns: Vec<u32>,
    /// Placeholder type index into the `TypeList`; `INVALID_INDEX` until
    /// inference or checking fills it.
    pub type_indices: Vec<u32>,
    pub flags: Vec<ExprFlags>,
    /// Row of each expression within its kind family.
    pub data_indices: Vec<u32>,

    // Binary
    pub left_expr_indices: Vec<u32>,
    pub operators: Vec<BinaryOp>,
    pub right_expr_indices: Vec<u32>,

    // Unary
    pub unary_operators: Vec<UnaryOp>,
    pub operand_indices: Vec<u32>,

    // Literal
    pub literal_values: Vec<&'src str>,
    pub literal_kinds: Vec<TokenKind>,

    // Variable reference
    pub var_names: Vec<&'src str>,
    pub symbol_indices: Vec<u32>,

    // Call
    pub callee_indices: Vec<u32>,
    pub arg_list_starts: Vec<u32>,
    pub arg_list_lengths: Vec<u32>,
    /// Flat slab of call argument expression indices.
    pub arg_indices: Vec<u32>,

    // Member access
    pub member_object_indices: Vec<u32>,
    pub member_names: Vec<&'src str>,

    // Indexing
    pub index_object_indices: Vec<u32>,
    pub index_subscript_indices: Vec<u32>,

    // Grouping
    pub grouped_expr_indices: Vec<u32>,

    // Generic parameter reference
    pub generic_symbol_indices: Vec<u32>,
}

impl<'src> ExprList<'src> {
    pub fn new() -> Self {
        ExprList::default()
    }

    /// Number of expressions.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn add_common(
        &mut self,
        kind: NodeType,
        data_index: u32,
        flags: ExprFlags,
        line: u32,
        col: u32,
    ) -> u32 {
        let index = self.kinds.len() as u32;
        self.kinds.push(kind);
        self.lines.push(line);
        self.columns.push(col);
        self.type_indices.push(INVALID_INDEX);
        self.flags.push(flags);
        self.data_indices.push(data_index);
        index
    }

    pub fn add_binary(
        &mut self,
        left: u32,
        op: BinaryOp,
        right: u32,
        line: u32,
        col: u32,
    ) -> u32 {
        let data = self.left_expr_indices.len() as u32;
        self.left_expr_indices.push(left);
        self.operators.push(op);
        self.right_expr_indices.push(right);
        self.add_common(NodeType::Binary, data, ExprFlags::NONE, line, col)
    }

    pub fn add_unary(&mut self, op: UnaryOp, operand: u32, line: u32, col: u32) -> u32 {
        let data = self.unary_operators.len() as u32;
        self.unary_operators.push(op);
        self.operand_indices.push(operand);
        self.add_common(NodeType::Unary, data, ExprFlags::NONE, line, col)
    }

    pub fn add_literal(&mut self, value: &'src str, kind: TokenKind, line: u32, col: u32) -> u32 {
        let data = self.literal_values.len() as u32;
        self.literal_values.push(value);
        self.literal_kinds.push(kind);
        self.add_common(
            NodeType::Literal,
            data,
            ExprFlags::CONSTANT.with(ExprFlags::PURE),
            line,
            col,
        )
    }

    pub fn add_variable(&mut self, name: &'src str, symbol: u32, line: u32, col: u32) -> u32 {
        let data = self.var_names.len() as u32;
        self.var_names.push(name);
        self.symbol_indices.push(symbol);
        self.add_common(NodeType::Variable, data, ExprFlags::NONE, line, col)
    }

    pub fn add_call(&mut self, callee: u32, args: &[u32], line: u32, col: u32) -> u32 {
        let data = self.callee_indices.len() as u32;
        self.callee_indices.push(callee);
        self.arg_list_starts.push(self.arg_indices.len() as u32);
        self.arg_list_lengths.push(args.len() as u32);
        self.arg_indices.extend_from_slice(args);
        self.add_common(
            NodeType::FunctionCall,
            data,
            ExprFlags::HAS_SIDE_EFFECTS,
            line,
            col,
        )
    }

    pub fn add_member(&mut self, object: u32, name: &'src str, line: u32, col: u32) -> u32 {
        let data = self.member_object_indices.len() as u32;
        self.member_object_indices.push(object);
        self.member_names.push(name);
        self.add_common(NodeType::Member, data, ExprFlags::NONE, line, col)
    }

    pub fn add_index(&mut self, object: u32, subscript: u32, line: u32, col: u32) -> u32 {
        let data = self.index_object_indices.len() as u32;
        self.index_object_indices.push(object);
        self.index_subscript_indices.push(subscript);
        self.add_common(NodeType::Index, data, ExprFlags::NONE, line, col)
    }

    pub fn add_grouping(&mut self, inner: u32, line: u32, col: u32) -> u32 {
        let data = self.grouped_expr_indices.len() as u32;
        self.grouped_expr_indices.push(inner);
        self.add_common(NodeType::Grouping, data, ExprFlags::NONE, line, col)
    }

    pub fn add_generic_param(&mut self, symbol: u32, line: u32, col: u32) -> u32 {
        let data = self.generic_symbol_indices.len() as u32;
        self.generic_symbol_indices.push(symbol);
        self.add_common(NodeType::GenericParam, data, ExprFlags::NONE, line, col)
    }

    /// Argument expression indices for a call expression.
    pub fn call_args(&self, expr: u32) -> &[u32] {
        debug_assert_eq!(self.kinds[expr as usize], NodeType::FunctionCall);
        let data = self.data_indices[expr as usize] as usize;
        let start = self.arg_list_starts[data] as usize;
        let len = self.arg_list_lengths[data] as usize;
        &self.arg_indices[start..start + len]
    }
}
