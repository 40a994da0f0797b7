//! Per-block liveness via fixed-point iteration over the reverse CFG.

use super::{is_register_operand, IrAnalyzer};
use rustc_hash::FxHashSet;
use yu_ir::IrOp;

/// Liveness information for one function.
///
/// Sets are stored flattened (counts + sorted register arrays), block
/// indices are function-relative. Phi value operands count as live out
/// of the predecessor supplying them, not live into the phi's block.
#[derive(Debug, Default)]
pub struct LivenessInfo {
    pub def_counts: Vec<u32>,
    pub defs: Vec<u32>,
    pub use_counts: Vec<u32>,
    pub uses: Vec<u32>,
    pub live_in_counts: Vec<u32>,
    pub live_in: Vec<u32>,
    pub live_out_counts: Vec<u32>,
    pub live_out: Vec<u32>,
}

impl LivenessInfo {
    fn slice<'a>(counts: &[u32], flat: &'a [u32], block: usize) -> &'a [u32] {
        let start: u32 = counts[..block].iter().sum();
        &flat[start as usize..(start + counts[block]) as usize]
    }

    pub fn live_in_of(&self, block: usize) -> &[u32] {
        Self::slice(&self.live_in_counts, &self.live_in, block)
    }

    pub fn live_out_of(&self, block: usize) -> &[u32] {
        Self::slice(&self.live_out_counts, &self.live_out, block)
    }

    pub fn defs_of(&self, block: usize) -> &[u32] {
        Self::slice(&self.def_counts, &self.defs, block)
    }

    pub fn uses_of(&self, block: usize) -> &[u32] {
        Self::slice(&self.use_counts, &self.uses, block)
    }
}

impl IrAnalyzer<'_> {
    /// Compute per-block def/use sets and fixed-point live-in/live-out
    /// for `function_index`.
    pub fn liveness_info(&self, function_index: u32) -> LivenessInfo {
        let instrs = self.ir.instructions();
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();
        let bb_range = functions.block_range(function_index as usize);
        let bb_base = bb_range.start;
        let n = bb_range.len();

        let mut defs: Vec<FxHashSet<u32>> = vec![FxHashSet::default(); n];
        let mut upward_uses: Vec<FxHashSet<u32>> = vec![FxHashSet::default(); n];
        // (pred_rel, value) pairs contributed by phi operands.
        let mut phi_flows: Vec<(usize, u32)> = Vec::new();

        for bb in bb_range.clone() {
            let rel = (bb - bb_base) as usize;
            let start = blocks.start_indices[bb as usize] as usize;
            let count = blocks.instruction_counts[bb as usize] as usize;
            for inst in start..start + count {
                let op = instrs.ops[inst];
                let operands = instrs.operands_of(inst);

                if op == IrOp::SsaPhi {
                    for pair in operands.chunks_exact(2) {
                        let pred_rel = (pair[1] - bb_base) as usize;
                        if pred_rel < n {
                            phi_flows.push((pred_rel, pair[0]));
                        }
                    }
                } else {
                    for (pos, &operand) in operands.iter().enumerate() {
                        if is_register_operand(op, pos) && !defs[rel].contains(&operand) {
                            upward_uses[rel].insert(operand);
                        }
                    }
                }
                defs[rel].insert(instrs.destinations[inst]);
            }
        }

        let mut live_in: Vec<FxHashSet<u32>> = vec![FxHashSet::default(); n];
        let mut live_out: Vec<FxHashSet<u32>> = vec![FxHashSet::default(); n];
        let mut changed = true;
        while changed {
            changed = false;
            for rel in (0..n).rev() {
                let mut new_out = FxHashSet::default();
                for &succ in blocks.successors_of(bb_base as usize + rel) {
                    new_out.extend(live_in[(succ - bb_base) as usize].iter().copied());
                }
                for &(pred, value) in &phi_flows {
                    if pred == rel {
                        new_out.insert(value);
                    }
                }

                let mut new_in = upward_uses[rel].clone();
                new_in.extend(new_out.iter().filter(|v| !defs[rel].contains(v)));

                if new_out != live_out[rel] || new_in != live_in[rel] {
                    live_out[rel] = new_out;
                    live_in[rel] = new_in;
                    changed = true;
                }
            }
        }

        let mut info = LivenessInfo::default();
        let flatten = |set: &FxHashSet<u32>, counts: &mut Vec<u32>, flat: &mut Vec<u32>| {
            let mut sorted: Vec<u32> = set.iter().copied().collect();
            sorted.sort_unstable();
            counts.push(sorted.len() as u32);
            flat.extend(sorted);
        };
        for rel in 0..n {
            flatten(&defs[rel], &mut info.def_counts, &mut info.defs);
            flatten(&upward_uses[rel], &mut info.use_counts, &mut info.uses);
            flatten(&live_in[rel], &mut info.live_in_counts, &mut info.live_in);
            flatten(&live_out[rel], &mut info.live_out_counts, &mut info.live_out);
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use crate::{IrAnalyzer, IrBuilder};
    use yu_ir::IrOp;

    #[test]
    fn straight_line_liveness_is_empty_at_the_ends() {
        let mut b = IrBuilder::new();
        b.create_function("f", &[], IrOp::TypeI32);
        b.create_bb();
        let a = b.add_instruction(IrOp::TypeI32, &[1]);
        let c = b.add_instruction(IrOp::TypeI32, &[2]);
        let sum = b.add_instruction(IrOp::OpAdd, &[a, c]);
        b.add_instruction(IrOp::FlowReturn, &[sum]);
        b.seal();

        let info = IrAnalyzer::new(&b).liveness_info(0);
        assert!(info.live_in_of(0).is_empty());
        assert!(info.live_out_of(0).is_empty());
        assert_eq!(info.defs_of(0).len(), 4);
        assert!(info.uses_of(0).is_empty());
    }

    #[test]
    fn value_defined_in_entry_and_used_in_successor_is_live_across() {
        let mut b = IrBuilder::new();
        b.create_function("f", &[], IrOp::TypeI32);
        b.create_bb();
        let a = b.add_instruction(IrOp::TypeI32, &[7]);
        b.add_instruction(IrOp::FlowJump, &[1]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[a]);
        b.seal();

        let info = IrAnalyzer::new(&b).liveness_info(0);
        assert_eq!(info.live_out_of(0), &[a]);
        assert_eq!(info.live_in_of(1), &[a]);
        assert_eq!(info.uses_of(1), &[a]);
    }

    #[test]
    fn phi_values_are_live_out_of_their_predecessors() {
        let mut b = IrBuilder::new();
        b.create_function("sel", &[], IrOp::TypeI32);
        b.create_bb();
        let c = b.add_instruction(IrOp::TypeBool, &[1]);
        b.add_instruction(IrOp::FlowBranch, &[c, 1, 2]);
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

        let info = IrAnalyzer::new(&b).liveness_info(0);
        // %t leaves bb1, %e leaves bb2; neither is live into the merge
        // block itself.
        assert_eq!(info.live_out_of(1), &[t]);
        assert_eq!(info.live_out_of(2), &[e]);
        assert!(info.live_in_of(3).is_empty());
    }
}
