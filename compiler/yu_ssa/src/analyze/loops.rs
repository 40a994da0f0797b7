//! Natural loop discovery from back-edges.

use super::IrAnalyzer;
use rustc_hash::{FxHashMap, FxHashSet};

/// Natural loops of one function.
///
/// One record per loop header: header block, nesting depth (1 for an
/// outermost loop), and member blocks (counts + flat array, sorted).
/// Block indices are function-relative.
#[derive(Debug, Default)]
pub struct LoopInfo {
    pub header_indices: Vec<u32>,
    pub loop_depths: Vec<u32>,
    pub block_counts: Vec<u32>,
    pub blocks: Vec<u32>,
}

impl LoopInfo {
    pub fn len(&self) -> usize {
        self.header_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header_indices.is_empty()
    }

    /// Member blocks of loop `index`.
    pub fn blocks_of(&self, index: usize) -> &[u32] {
        let start: u32 = self.block_counts[..index].iter().sum();
        &self.blocks[start as usize..(start + self.block_counts[index]) as usize]
    }
}

impl IrAnalyzer<'_> {
    /// Identify natural loops: a back-edge is a successor edge whose
    /// target dominates its source; the loop body is everything that
    /// reaches the source without passing through the header.
    pub fn loop_info(&self, function_index: u32) -> LoopInfo {
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();
        let bb_range = functions.block_range(function_index as usize);
        let bb_base = bb_range.start;
        let n = bb_range.len();

        let dominators = self.dominator_info(function_index);

        // Collect loop bodies per header; multiple back-edges to one
        // header merge into one loop.
        let mut loops: FxHashMap<u32, FxHashSet<u32>> = FxHashMap::default();
        for rel in 0..n as u32 {
            for &succ in blocks.successors_of((bb_base + rel) as usize) {
                let header = succ - bb_base;
                if !dominators.dominates(header, rel) {
                    continue;
                }

                let body = loops.entry(header).or_default();
                body.insert(header);
                // Backward walk from the back-edge source.
                let mut worklist = vec![rel];
                while let Some(block) = worklist.pop() {
                    if !body.insert(block) {
                        continue;
                    }
                    for &pred in blocks.predecessors_of((bb_base + block) as usize) {
                        let pred_rel = pred - bb_base;
                        if pred_rel != header && !body.contains(&pred_rel) {
                            worklist.push(pred_rel);
                        }
                    }
                }
            }
        }

        let mut headers: Vec<u32> = loops.keys().copied().collect();
        headers.sort_unstable();

        let mut info = LoopInfo::default();
        for &header in &headers {
            let body = &loops[&header];
            // Depth: number of loops whose body contains this header.
            let depth = headers
                .iter()
                .filter(|&&other| loops[&other].contains(&header))
                .count() as u32;

            let mut members: Vec<u32> = body.iter().copied().collect();
            members.sort_unstable();
            info.header_indices.push(header);
            info.loop_depths.push(depth);
            info.block_counts.push(members.len() as u32);
            info.blocks.extend(members);
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use crate::{IrAnalyzer, IrBuilder};
    use yu_ir::IrOp;

    #[test]
    fn straight_line_code_has_no_loops() {
        let mut b = IrBuilder::new();
        b.create_function("f", &[], IrOp::TypeVoid);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.seal();
        assert!(IrAnalyzer::new(&b).loop_info(0).is_empty());
    }

    #[test]
    fn single_back_edge_forms_a_loop() {
        // entry(0) -> header(1); header -> body(2) | exit(3); body -> header.
        let mut b = IrBuilder::new();
        b.create_function("loopy", &[], IrOp::TypeVoid);
        b.create_bb();
        let c = b.add_instruction(IrOp::TypeBool, &[1]);
        b.add_instruction(IrOp::FlowJump, &[1]);
        b.create_bb();
        b.add_instruction(IrOp::FlowBranch, &[c, 2, 3]);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[1]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.seal();

        let info = IrAnalyzer::new(&b).loop_info(0);
        assert_eq!(info.len(), 1);
        assert_eq!(info.header_indices, vec![1]);
        assert_eq!(info.loop_depths, vec![1]);
        assert_eq!(info.blocks_of(0), &[1, 2]);
    }

    #[test]
    fn nested_loops_report_depth() {
        // entry(0) -> outer(1) -> inner(2) -> inner_body(3) -> inner(2)
        // inner -> outer_latch(4) -> outer(1); outer -> exit(5).
        let mut b = IrBuilder::new();
        b.create_function("nest", &[], IrOp::TypeVoid);
        b.create_bb();
        let c = b.add_instruction(IrOp::TypeBool, &[1]);
        b.add_instruction(IrOp::FlowJump, &[1]);
        b.create_bb();
        b.add_instruction(IrOp::FlowBranch, &[c, 2, 5]);
        b.create_bb();
        b.add_instruction(IrOp::FlowBranch, &[c, 3, 4]);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[2]);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[1]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.seal();

        let info = IrAnalyzer::new(&b).loop_info(0);
        assert_eq!(info.len(), 2);
        // Outer loop headed at 1 (depth 1), inner at 2 (depth 2).
        assert_eq!(info.header_indices, vec![1, 2]);
        assert_eq!(info.loop_depths, vec![1, 2]);
        assert_eq!(info.blocks_of(0), &[1, 2, 3, 4]);
        assert_eq!(info.blocks_of(1), &[2, 3]);
    }
}
