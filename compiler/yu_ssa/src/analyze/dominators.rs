//! Immediate dominators via the iterative Cooper–Harvey–Kennedy
//! algorithm over the reverse post-order of the CFG.

use super::IrAnalyzer;
use yu_ir::INVALID_INDEX;

/// Dominator information for one function.
///
/// Block indices are function-relative (0 is the entry block).
/// Unreachable blocks have `idom_indices == INVALID_INDEX` and an empty
/// dominator list.
#[derive(Debug, Default)]
pub struct DominatorInfo {
    /// Immediate dominator of each block; the entry block is its own
    /// idom.
    pub idom_indices: Vec<u32>,
    pub dominator_counts: Vec<u32>,
    /// Flattened dominator lists: for each block, the block itself and
    /// every dominator up to the entry.
    pub dominators: Vec<u32>,
}

impl DominatorInfo {
    /// Dominator slice of a block (itself first, entry last).
    pub fn dominators_of(&self, block: usize) -> &[u32] {
        let start: u32 = self.dominator_counts[..block].iter().sum();
        let count = self.dominator_counts[block];
        &self.dominators[start as usize..(start + count) as usize]
    }

    /// Check whether `a` dominates `b` (both function-relative).
    pub fn dominates(&self, a: u32, b: u32) -> bool {
        self.dominators_of(b as usize).contains(&a)
    }
}

impl IrAnalyzer<'_> {
    /// Compute immediate dominators for `function_index`.
    pub fn dominator_info(&self, function_index: u32) -> DominatorInfo {
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();
        let bb_range = functions.block_range(function_index as usize);
        let bb_base = bb_range.start;
        let n = bb_range.len();
        if n == 0 {
            return DominatorInfo::default();
        }

        let successors =
            |b: usize| blocks.successors_of(bb_base as usize + b).iter().map(move |&s| (s - bb_base) as usize);
        let predecessors =
            |b: usize| blocks.predecessors_of(bb_base as usize + b).iter().map(move |&p| (p - bb_base) as usize);

        // Reverse post-order via iterative DFS.
        let mut postorder = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        visited[0] = true;
        while let Some(&(block, next)) = stack.last() {
            let succ: Vec<usize> = successors(block).collect();
            if next < succ.len() {
                stack.last_mut().unwrap().1 += 1;
                let child = succ[next];
                if !visited[child] {
                    visited[child] = true;
                    stack.push((child, 0));
                }
            } else {
                postorder.push(block);
                stack.pop();
            }
        }
        let rpo: Vec<usize> = postorder.iter().rev().copied().collect();
        let mut rpo_number = vec![usize::MAX; n];
        for (i, &b) in rpo.iter().enumerate() {
            rpo_number[b] = i;
        }

        // Iterate to a fixed point.
        let mut idom: Vec<Option<usize>> = vec![None; n];
        idom[0] = Some(0);
        let mut changed = true;
        while changed {
            changed = false;
            for &b in rpo.iter().skip(1) {
                let mut new_idom: Option<usize> = None;
                for p in predecessors(b) {
                    if idom[p].is_none() {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => p,
                        Some(current) => intersect(&idom, &rpo_number, p, current),
                    });
                }
                if let Some(candidate) = new_idom {
                    if idom[b] != Some(candidate) {
                        idom[b] = Some(candidate);
                        changed = true;
                    }
                }
            }
        }

        // Flatten: each block lists itself and its dominator chain.
        let mut info = DominatorInfo {
            idom_indices: idom
                .iter()
                .map(|d| d.map_or(INVALID_INDEX, |v| v as u32))
                .collect(),
            dominator_counts: Vec::with_capacity(n),
            dominators: Vec::new(),
        };
        for b in 0..n {
            if idom[b].is_none() {
                info.dominator_counts.push(0);
                continue;
            }
            let mut chain = vec![b as u32];
            let mut current = b;
            while current != 0 {
                current = idom[current].unwrap_or(0);
                chain.push(current as u32);
            }
            info.dominator_counts.push(chain.len() as u32);
            info.dominators.extend(chain);
        }
        info
    }
}

/// CHK two-finger intersection over RPO numbers.
fn intersect(
    idom: &[Option<usize>],
    rpo_number: &[usize],
    mut a: usize,
    mut b: usize,
) -> usize {
    while a != b {
        while rpo_number[a] > rpo_number[b] {
            a = idom[a].unwrap_or(0);
        }
        while rpo_number[b] > rpo_number[a] {
            b = idom[b].unwrap_or(0);
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use crate::{IrAnalyzer, IrBuilder};
    use yu_ir::IrOp;

    /// entry -> {then, else} -> merge diamond.
    fn diamond() -> IrBuilder {
        let mut b = IrBuilder::new();
        b.create_function("sel", &[], IrOp::TypeVoid);
        b.create_bb();
        let c = b.add_instruction(IrOp::TypeBool, &[1]);
        b.add_instruction(IrOp::FlowBranch, &[c, 1, 2]);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[3]);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[3]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.seal();
        b
    }

    #[test]
    fn diamond_idoms_point_at_entry() {
        let b = diamond();
        let info = IrAnalyzer::new(&b).dominator_info(0);
        assert_eq!(info.idom_indices, vec![0, 0, 0, 0]);
        assert!(info.dominates(0, 3));
        // Neither arm dominates the merge.
        assert!(!info.dominates(1, 3));
        assert!(!info.dominates(2, 3));
    }

    #[test]
    fn chain_dominators_accumulate() {
        let mut b = IrBuilder::new();
        b.create_function("chain", &[], IrOp::TypeVoid);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[1]);
        b.create_bb();
        b.add_instruction(IrOp::FlowJump, &[2]);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[]);
        b.seal();

        let info = IrAnalyzer::new(&b).dominator_info(0);
        assert_eq!(info.idom_indices, vec![0, 0, 1]);
        assert_eq!(info.dominators_of(2), &[2, 1, 0]);
    }

    #[test]
    fn loop_header_dominates_body() {
        // entry -> header -> body -> header (back edge), header -> exit.
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

        let info = IrAnalyzer::new(&b).dominator_info(0);
        assert!(info.dominates(1, 2));
        assert!(info.dominates(1, 3));
        assert!(!info.dominates(2, 1));
    }
}
