//! Control-flow validation.

use super::IrAnalyzer;
use std::collections::VecDeque;
use tracing::warn;
use yu_ir::IrOp;

impl IrAnalyzer<'_> {
    /// Validate the CFG of every function:
    ///
    /// - the entry block has no predecessors;
    /// - every successor edge targets a block of the same function;
    /// - every block is reachable from the entry (single BFS);
    /// - every sink block (zero successors) ends with a return or an
    ///   unreachable marker.
    pub fn validate_control_flow(&self) -> bool {
        let instrs = self.ir.instructions();
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();

        for func in 0..functions.len() {
            let bb_range = functions.block_range(func);
            let bb_base = bb_range.start;
            let bb_count = bb_range.len();
            if bb_count == 0 {
                continue;
            }

            if !blocks.predecessors_of(bb_base as usize).is_empty() {
                warn!(func, "entry block cannot have predecessors");
                return false;
            }

            for bb in bb_range.clone() {
                for &succ in blocks.successors_of(bb as usize) {
                    if !bb_range.contains(&succ) {
                        warn!(func, bb, succ, "branch target outside function");
                        return false;
                    }
                }
            }

            // Reachability from the entry block.
            let mut reachable = vec![false; bb_count];
            let mut worklist = VecDeque::new();
            reachable[0] = true;
            worklist.push_back(bb_base);
            while let Some(bb) = worklist.pop_front() {
                for &succ in blocks.successors_of(bb as usize) {
                    let rel = (succ - bb_base) as usize;
                    if !reachable[rel] {
                        reachable[rel] = true;
                        worklist.push_back(succ);
                    }
                }
            }
            if let Some(unreached) = reachable.iter().position(|&r| !r) {
                warn!(func, block = bb_base + unreached as u32, "unreachable block");
                return false;
            }

            // Sink blocks must terminate.
            for bb in bb_range.clone() {
                if !blocks.successors_of(bb as usize).is_empty() {
                    continue;
                }
                let count = blocks.instruction_counts[bb as usize];
                if count == 0 {
                    warn!(func, bb, "empty sink block");
                    return false;
                }
                let last = (blocks.start_indices[bb as usize] + count - 1) as usize;
                if !matches!(
                    instrs.ops[last],
                    IrOp::FlowReturn | IrOp::FlowUnreachable | IrOp::SsaUnreachable
                ) {
                    warn!(func, bb, "sink block must end with return or unreachable");
                    return false;
                }
            }
        }

        true
    }
}
