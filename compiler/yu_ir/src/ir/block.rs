//! Columnar basic-block storage.

/// Columnar basic-block table.
///
/// Instruction ranges are contiguous: a block's instructions are
/// `start_indices[b] .. start_indices[b] + instruction_counts[b]` in the
/// instruction table. Successor and predecessor edges live in flat slabs
/// finalized when the IR is sealed.
#[derive(Debug, Default)]
pub struct BlockList {
    pub start_indices: Vec<u32>,
    pub instruction_counts: Vec<u32>,

    pub successor_starts: Vec<u32>,
    pub successor_counts: Vec<u32>,
    pub successors: Vec<u32>,

    pub predecessor_starts: Vec<u32>,
    pub predecessor_counts: Vec<u32>,
    pub predecessors: Vec<u32>,
}

impl BlockList {
    pub fn new() -> Self {
        BlockList::default()
    }

    /// Number of blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.start_indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_indices.is_empty()
    }

    /// Successor block ids of block `index`.
    #[inline]
    pub fn successors_of(&self, index: usize) -> &[u32] {
        let start = self.successor_starts[index] as usize;
        let count = self.successor_counts[index] as usize;
        &self.successors[start..start + count]
    }

    /// Predecessor block ids of block `index`.
    #[inline]
    pub fn predecessors_of(&self, index: usize) -> &[u32] {
        let start = self.predecessor_starts[index] as usize;
        let count = self.predecessor_counts[index] as usize;
        &self.predecessors[start..start + count]
    }
}
