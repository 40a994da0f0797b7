//! Def-use chains.

use super::{is_register_operand, IrAnalyzer};
use rustc_hash::FxHashMap;
use yu_ir::{IrOp, INVALID_INDEX};

/// Def-use chains of one function.
///
/// Registers map to their defining instruction (`INVALID_INDEX` for
/// parameters) and to the instructions and blocks that read them.
/// Instruction and block indices are absolute (module-wide). Phi uses
/// are attributed to the predecessor block supplying the value, because
/// that is where the operand is live.
#[derive(Debug, Default)]
pub struct DefUseInfo {
    pub def: FxHashMap<u32, u32>,
    pub def_block: FxHashMap<u32, u32>,
    pub uses: FxHashMap<u32, Vec<u32>>,
    pub use_blocks: FxHashMap<u32, Vec<u32>>,
}

impl IrAnalyzer<'_> {
    /// Build def-use chains for `function_index`.
    pub fn def_use_chains(&self, function_index: u32) -> DefUseInfo {
        let instrs = self.ir.instructions();
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();
        let func = function_index as usize;
        let bb_range = functions.block_range(func);

        let mut info = DefUseInfo::default();

        // Parameters are defined "before" the entry block.
        for reg in 0..functions.param_counts[func] {
            info.def.insert(reg, INVALID_INDEX);
            info.def_block.insert(reg, bb_range.start);
        }

        for bb in bb_range.clone() {
            let start = blocks.start_indices[bb as usize] as usize;
            let count = blocks.instruction_counts[bb as usize] as usize;
            for inst in start..start + count {
                let op = instrs.ops[inst];
                let operands = instrs.operands_of(inst);

                info.def.insert(instrs.destinations[inst], inst as u32);
                info.def_block.insert(instrs.destinations[inst], bb);

                if op == IrOp::SsaPhi {
                    for pair in operands.chunks_exact(2) {
                        info.uses.entry(pair[0]).or_default().push(inst as u32);
                        info.use_blocks.entry(pair[0]).or_default().push(pair[1]);
                    }
                } else {
                    for (pos, &operand) in operands.iter().enumerate() {
                        if !is_register_operand(op, pos) {
                            continue;
                        }
                        info.uses.entry(operand).or_default().push(inst as u32);
                        info.use_blocks.entry(operand).or_default().push(bb);
                    }
                }
            }
        }

        info
    }
}
