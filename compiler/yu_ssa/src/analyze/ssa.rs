//! SSA well-formedness validation.

use super::{is_register_operand, IrAnalyzer};
use rustc_hash::FxHashSet;
use tracing::warn;
use yu_ir::IrOp;

impl IrAnalyzer<'_> {
    /// Validate the single-assignment property and def-before-use.
    ///
    /// Per function: the `defined` set is seeded with the parameter
    /// registers `[0, param_count)`, then instructions are scanned in
    /// order. Every register operand must already be defined; every
    /// destination must not be. Phi value operands are resolved against
    /// the supplying predecessor's per-block def set.
    pub fn validate_ssa(&self) -> bool {
        let instrs = self.ir.instructions();
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();

        for func in 0..functions.len() {
            let bb_range = functions.block_range(func);
            let bb_base = bb_range.start;
            let bb_count = bb_range.len();
            let param_count = functions.param_counts[func];
            let reg_count = self.function_reg_count(func) as usize;

            let mut defined = vec![false; reg_count];
            for reg in defined.iter_mut().take(param_count as usize) {
                *reg = true;
            }
            let mut bb_defs: Vec<FxHashSet<u32>> = vec![FxHashSet::default(); bb_count];

            for bb in bb_range.clone() {
                let bb_rel = (bb - bb_base) as usize;
                let start = blocks.start_indices[bb as usize] as usize;
                let count = blocks.instruction_counts[bb as usize] as usize;

                for inst in start..start + count {
                    let op = instrs.ops[inst];
                    let operands = instrs.operands_of(inst);

                    if op == IrOp::SsaPhi {
                        for pair in operands.chunks_exact(2) {
                            let (value, pred) = (pair[0], pair[1]);
                            if !bb_range.contains(&pred) {
                                warn!(inst, pred, "phi predecessor block out of range");
                                return false;
                            }
                            let pred_rel = (pred - bb_base) as usize;
                            let known = (value as usize) < reg_count
                                && (defined[value as usize]
                                    || bb_defs[pred_rel].contains(&value));
                            if !known {
                                warn!(
                                    inst,
                                    value, pred, "phi uses a value not defined in its predecessor"
                                );
                                return false;
                            }
                        }
                    } else {
                        for (pos, &operand) in operands.iter().enumerate() {
                            if !is_register_operand(op, pos) {
                                continue;
                            }
                            if (operand as usize) >= reg_count || !defined[operand as usize] {
                                warn!(inst, operand, "use of undefined register");
                                return false;
                            }
                        }
                    }

                    let dest = instrs.destinations[inst] as usize;
                    if dest >= reg_count {
                        warn!(inst, dest, "destination register out of range");
                        return false;
                    }
                    if defined[dest] {
                        warn!(inst, dest, "multiple definitions of register");
                        return false;
                    }
                    defined[dest] = true;
                    bb_defs[bb_rel].insert(dest as u32);
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{IrAnalyzer, IrBuilder};
    use yu_ir::IrOp;

    fn arithmetic_function() -> IrBuilder {
        let mut b = IrBuilder::new();
        b.create_function("main", &[], IrOp::TypeI32);
        b.create_bb();
        let a = b.add_instruction(IrOp::TypeI32, &[10]);
        let c = b.add_instruction(IrOp::TypeI32, &[5]);
        let sum = b.add_instruction(IrOp::OpAdd, &[a, c]);
        b.add_instruction(IrOp::FlowReturn, &[sum]);
        b.seal();
        b
    }

    #[test]
    fn straight_line_function_is_well_formed() {
        let b = arithmetic_function();
        assert!(IrAnalyzer::new(&b).validate_ssa());
    }

    #[test]
    fn parameters_are_pre_defined() {
        let mut b = IrBuilder::new();
        b.create_function("add", &[IrOp::TypeI32, IrOp::TypeI32], IrOp::TypeI32);
        b.create_bb();
        let sum = b.add_instruction(IrOp::OpAdd, &[0, 1]);
        b.add_instruction(IrOp::FlowReturn, &[sum]);
        b.seal();
        assert!(IrAnalyzer::new(&b).validate_ssa());
    }

    #[test]
    fn use_before_definition_is_rejected() {
        let mut b = IrBuilder::new();
        b.create_function("bad", &[], IrOp::TypeI32);
        b.create_bb();
        // %0 = add %1, %1 uses a register defined later.
        b.add_instruction(IrOp::OpAdd, &[1, 1]);
        b.add_instruction(IrOp::TypeI32, &[3]);
        b.seal();
        assert!(!IrAnalyzer::new(&b).validate_ssa());
    }

    #[test]
    fn phi_values_resolve_through_predecessors() {
        let mut b = IrBuilder::new();
        b.create_function("sel", &[], IrOp::TypeI32);
        b.create_bb();
        let x = b.add_instruction(IrOp::TypeI32, &[5]);
        let y = b.add_instruction(IrOp::TypeI32, &[10]);
        let cmp = b.add_instruction(IrOp::OpLt, &[x, y]);
        b.add_instruction(IrOp::FlowBranch, &[cmp, 1, 2]);
        b.create_bb();
        let t = b.add_instruction(IrOp::TypeI32, &[42]);
        b.add_instruction(IrOp::FlowJump, &[3]);
        b.create_bb();
        let e = b.add_instruction(IrOp::TypeI32, &[24]);
        b.add_instruction(IrOp::FlowJump, &[3]);
        b.create_bb();
        let phi = b.add_instruction(IrOp::SsaPhi, &[t, 1, e, 2]);
        b.add_instruction(IrOp::FlowReturn, &[phi]);
        b.seal();

        assert!(IrAnalyzer::new(&b).validate_ssa());
    }

    #[test]
    fn phi_with_out_of_range_predecessor_is_rejected() {
        let mut b = IrBuilder::new();
        b.create_function("bad", &[], IrOp::TypeI32);
        b.create_bb();
        let x = b.add_instruction(IrOp::TypeI32, &[1]);
        b.add_instruction(IrOp::SsaPhi, &[x, 9]);
        b.seal();
        assert!(!IrAnalyzer::new(&b).validate_ssa());
    }

    #[test]
    fn branch_targets_are_not_register_uses() {
        // Branch targets name blocks 1 and 2; those ids must not be
        // misread as (undefined) registers.
        let mut b = IrBuilder::new();
        b.create_function("f", &[], IrOp::TypeVoid);
        b.create_bb();
        let c = b.add_instruction(IrOp::TypeBool, &[1]);
        b.add_instruction(IrOp::FlowBranch, &[c, 1, 2]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.seal();
        assert!(IrAnalyzer::new(&b).validate_ssa());
    }
}
