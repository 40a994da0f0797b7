//! Columnar statement storage.

use super::{NodeType, StmtFlags};
use crate::INVALID_INDEX;

/// Columnar statement table.
///
/// Layout mirrors [`super::ExprList`]: common columns per statement,
/// kind-specific columns per statement of that kind, linked by
/// `data_indices`.
#[derive(Debug, Default)]
pub struct StmtList<'src> {
    pub kinds: Vec<NodeType>,
    pub lines: Vec<u32>,
    pub columns: Vec<u32>,
    pub flags: Vec<StmtFlags>,
    pub data_indices: Vec<u32>,

    // If
    pub condition_indices: Vec<u32>,
    pub then_stmt_indices: Vec<u32>,
    /// `INVALID_INDEX` when there is no `else` branch.
    pub else_stmt_indices: Vec<u32>,

    // While
    pub while_cond_indices: Vec<u32>,
    pub while_body_indices: Vec<u32>,

    // For (C-style; any clause may be INVALID_INDEX)
    pub for_init_indices: Vec<u32>,
    pub for_cond_indices: Vec<u32>,
    pub for_update_indices: Vec<u32>,
    pub for_body_indices: Vec<u32>,

    // Block
    pub block_stmt_starts: Vec<u32>,
    pub block_stmt_lengths: Vec<u32>,
    pub scope_levels: Vec<u32>,
    /// Flat slab of block member statement indices.
    pub block_stmt_indices: Vec<u32>,

    // Variable declaration
    pub var_names: Vec<&'src str>,
    pub var_type_indices: Vec<u32>,
    pub initializer_indices: Vec<u32>,
    pub symbol_indices: Vec<u32>,

    // Return
    /// `INVALID_INDEX` for a bare `return;`.
    pub return_value_indices: Vec<u32>,

    // Function declaration
    pub func_names: Vec<&'src str>,
    pub func_type_indices: Vec<u32>,
    pub func_body_indices: Vec<u32>,
    pub param_list_starts: Vec<u32>,
    pub param_list_lengths: Vec<u32>,
    /// Flat slab of parameter symbol indices.
    pub param_indices: Vec<u32>,

    // Expression statement
    pub expr_stmt_indices: Vec<u32>,

    // Switch
    pub switch_value_indices: Vec<u32>,
    pub case_list_starts: Vec<u32>,
    pub case_list_lengths: Vec<u32>,
    /// Flat slab of case value expression indices; `INVALID_INDEX` marks
    /// the `default` case.
    pub case_value_indices: Vec<u32>,
    /// Flat slab of case body statement indices, parallel to
    /// `case_value_indices`.
    pub case_body_indices: Vec<u32>,

    // Import
    pub import_paths: Vec<&'src str>,
    pub import_aliases: Vec<Option<&'src str>>,

    // Class declaration
    pub class_names: Vec<&'src str>,
    pub class_generic_starts: Vec<u32>,
    pub class_generic_counts: Vec<u32>,
    pub class_member_starts: Vec<u32>,
    pub class_member_lengths: Vec<u32>,
    /// Flat slab of class member statement indices.
    pub class_member_indices: Vec<u32>,

    // Enum declaration
    pub enum_names: Vec<&'src str>,
    pub enum_member_starts: Vec<u32>,
    pub enum_member_lengths: Vec<u32>,
    pub enum_member_names: Vec<&'src str>,
    /// Parallel to `enum_member_names`; `INVALID_INDEX` when no initializer.
    pub enum_member_inits: Vec<u32>,
}

impl<'src> StmtList<'src> {
    pub fn new() -> Self {
        StmtList::default()
    }

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
        flags: StmtFlags,
        line: u32,
        col: u32,
    ) -> u32 {
        let index = self.kinds.len() as u32;
        self.kinds.push(kind);
        self.lines.push(line);
        self.columns.push(col);
        self.flags.push(flags);
        self.data_indices.push(data_index);
        index
    }

    pub fn add_if(&mut self, cond: u32, then_stmt: u32, else_stmt: u32, line: u32, col: u32) -> u32 {
        let data = self.condition_indices.len() as u32;
        self.condition_indices.push(cond);
        self.then_stmt_indices.push(then_stmt);
        self.else_stmt_indices.push(else_stmt);
        self.add_common(NodeType::If, data, StmtFlags::NONE, line, col)
    }

    pub fn add_while(&mut self, cond: u32, body: u32, line: u32, col: u32) -> u32 {
        let data = self.while_cond_indices.len() as u32;
        self.while_cond_indices.push(cond);
        self.while_body_indices.push(body);
        self.add_common(NodeType::While, data, StmtFlags::NONE, line, col)
    }

    pub fn add_for(
        &mut self,
        init: u32,
        cond: u32,
        update: u32,
        body: u32,
        line: u32,
        col: u32,
    ) -> u32 {
        let data = self.for_init_indices.len() as u32;
        self.for_init_indices.push(init);
        self.for_cond_indices.push(cond);
        self.for_update_indices.push(update);
        self.for_body_indices.push(body);
        self.add_common(NodeType::For, data, StmtFlags::NONE, line, col)
    }

    pub fn add_block(&mut self, stmts: &[u32], scope: u32, line: u32, col: u32) -> u32 {
        let data = self.block_stmt_starts.len() as u32;
        self.block_stmt_starts.push(self.block_stmt_indices.len() as u32);
        self.block_stmt_lengths.push(stmts.len() as u32);
        self.scope_levels.push(scope);
        self.block_stmt_indices.extend_from_slice(stmts);
        self.add_common(NodeType::Block, data, StmtFlags::NONE, line, col)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_var_decl(
        &mut self,
        name: &'src str,
        type_idx: u32,
        init_idx: u32,
        symbol_idx: u32,
        flags: StmtFlags,
        line: u32,
        col: u32,
    ) -> u32 {
        let data = self.var_names.len() as u32;
        self.var_names.push(name);
        self.var_type_indices.push(type_idx);
        self.initializer_indices.push(init_idx);
        self.symbol_indices.push(symbol_idx);
        self.add_common(NodeType::VarDecl, data, flags, line, col)
    }

    pub fn add_return(&mut self, value_idx: u32, line: u32, col: u32) -> u32 {
        let data = self.return_value_indices.len() as u32;
        self.return_value_indices.push(value_idx);
        self.add_common(NodeType::Return, data, StmtFlags::NONE, line, col)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_function(
        &mut self,
        name: &'src str,
        type_idx: u32,
        params: &[u32],
        body_idx: u32,
        flags: StmtFlags,
        line: u32,
        col: u32,
    ) -> u32 {
        let data = self.func_names.len() as u32;
        self.func_names.push(name);
        self.func_type_indices.push(type_idx);
        self.func_body_indices.push(body_idx);
        self.param_list_starts.push(self.param_indices.len() as u32);
        self.param_list_lengths.push(params.len() as u32);
        self.param_indices.extend_from_slice(params);
        self.add_common(NodeType::FunctionDecl, data, flags, line, col)
    }

    pub fn add_expression_stmt(&mut self, expr_idx: u32, line: u32, col: u32) -> u32 {
        let data = self.expr_stmt_indices.len() as u32;
        self.expr_stmt_indices.push(expr_idx);
        self.add_common(NodeType::ExpressionStmt, data, StmtFlags::NONE, line, col)
    }

    pub fn add_switch(
        &mut self,
        value: u32,
        case_values: &[u32],
        case_bodies: &[u32],
        line: u32,
        col: u32,
    ) -> u32 {
        debug_assert_eq!(case_values.len(), case_bodies.len());
        let data = self.switch_value_indices.len() as u32;
        self.switch_value_indices.push(value);
        self.case_list_starts.push(self.case_value_indices.len() as u32);
        self.case_list_lengths.push(case_values.len() as u32);
        self.case_value_indices.extend_from_slice(case_values);
        self.case_body_indices.extend_from_slice(case_bodies);
        self.add_common(NodeType::Switch, data, StmtFlags::NONE, line, col)
    }

    pub fn add_break(&mut self, line: u32, col: u32) -> u32 {
        self.add_common(NodeType::Break, INVALID_INDEX, StmtFlags::NONE, line, col)
    }

    pub fn add_continue(&mut self, line: u32, col: u32) -> u32 {
        self.add_common(NodeType::Continue, INVALID_INDEX, StmtFlags::NONE, line, col)
    }

    pub fn add_import(
        &mut self,
        path: &'src str,
        alias: Option<&'src str>,
        line: u32,
        col: u32,
    ) -> u32 {
        let data = self.import_paths.len() as u32;
        self.import_paths.push(path);
        self.import_aliases.push(alias);
        self.add_common(NodeType::Import, data, StmtFlags::NONE, line, col)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_class(
        &mut self,
        name: &'src str,
        generic_start: u32,
        generic_count: u32,
        members: &[u32],
        flags: StmtFlags,
        line: u32,
        col: u32,
    ) -> u32 {
        let data = self.class_names.len() as u32;
        self.class_names.push(name);
        self.class_generic_starts.push(generic_start);
        self.class_generic_counts.push(generic_count);
        self.class_member_starts.push(self.class_member_indices.len() as u32);
        self.class_member_lengths.push(members.len() as u32);
        self.class_member_indices.extend_from_slice(members);
        self.add_common(NodeType::ClassDecl, data, flags, line, col)
    }

    pub fn add_enum(
        &mut self,
        name: &'src str,
        member_names: &[&'src str],
        member_inits: &[u32],
        line: u32,
        col: u32,
    ) -> u32 {
        debug_assert_eq!(member_names.len(), member_inits.len());
        let data = self.enum_names.len() as u32;
        self.enum_names.push(name);
        self.enum_member_starts.push(self.enum_member_names.len() as u32);
        self.enum_member_lengths.push(member_names.len() as u32);
        self.enum_member_names.extend_from_slice(member_names);
        self.enum_member_inits.extend_from_slice(member_inits);
        self.add_common(NodeType::EnumDecl, data, StmtFlags::NONE, line, col)
    }

    /// Member statement indices of a block statement.
    pub fn block_stmts(&self, stmt: u32) -> &[u32] {
        debug_assert_eq!(self.kinds[stmt as usize], NodeType::Block);
        let data = self.data_indices[stmt as usize] as usize;
        let start = self.block_stmt_starts[data] as usize;
        let len = self.block_stmt_lengths[data] as usize;
        &self.block_stmt_indices[start..start + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_slices_resolve_members() {
        let mut stmts = StmtList::new();
        let a = stmts.add_break(1, 1);
        let b = stmts.add_continue(2, 1);
        let block = stmts.add_block(&[a, b], 1, 1, 1);

        assert_eq!(stmts.block_stmts(block), &[a, b]);
        assert_eq!(stmts.scope_levels[0], 1);
    }

    #[test]
    fn var_decl_columns() {
        let mut stmts = StmtList::new();
        let s = stmts.add_var_decl("x", 7, 0, 3, StmtFlags::IS_CONST, 4, 2);
        let data = stmts.data_indices[s as usize] as usize;

        assert_eq!(stmts.kinds[s as usize], NodeType::VarDecl);
        assert_eq!(stmts.var_names[data], "x");
        assert_eq!(stmts.var_type_indices[data], 7);
        assert_eq!(stmts.symbol_indices[data], 3);
        assert!(stmts.flags[s as usize].contains(StmtFlags::IS_CONST));
        assert_eq!((stmts.lines[s as usize], stmts.columns[s as usize]), (4, 2));
    }

    #[test]
    fn switch_slabs_stay_parallel() {
        let mut stmts = StmtList::new();
        let body_a = stmts.add_break(2, 1);
        let body_b = stmts.add_break(3, 1);
        let sw = stmts.add_switch(9, &[5, INVALID_INDEX], &[body_a, body_b], 1, 1);

        let data = stmts.data_indices[sw as usize] as usize;
        let start = stmts.case_list_starts[data] as usize;
        let len = stmts.case_list_lengths[data] as usize;
        assert_eq!(&stmts.case_value_indices[start..start + len], &[5, INVALID_INDEX]);
        assert_eq!(&stmts.case_body_indices[start..start + len], &[body_a, body_b]);
    }
}
