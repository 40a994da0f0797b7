//! Columnar instruction storage.

use super::IrOp;

/// Memory operand descriptors, one row per memory instruction.
///
/// Each row records the addressing shape of a `Mem*` instruction:
/// base register, signed displacement, optional index register, and scale.
#[derive(Debug, Default)]
pub struct MemOps {
    /// Index back into the main instruction columns.
    pub instruction_indices: Vec<u32>,
    pub base_regs: Vec<u32>,
    pub offsets: Vec<i32>,
    /// `u32::MAX` when the access has no index register.
    pub index_regs: Vec<u32>,
    pub scales: Vec<u8>,
}

/// Immediate payloads, one row per immediate-carrying instruction.
#[derive(Debug, Default)]
pub struct ImmediateOps {
    pub instruction_indices: Vec<u32>,
    pub values: Vec<i64>,
}

/// Columnar instruction table.
///
/// Operands live in a flat slab; each instruction records its operand
/// count, and `operand_starts` gives the slab offset. Conversions and
/// memory ops additionally push type tags into the `operand_types` slab
/// (two tags for conversions: from then to; one for memory ops: the
/// value type).
#[derive(Debug, Default)]
pub struct InstructionList {
    pub ops: Vec<IrOp>,
    /// Destination virtual register of each instruction.
    pub destinations: Vec<u32>,
    pub operand_starts: Vec<u32>,
    pub operand_counts: Vec<u32>,
    /// Flat operand slab. Depending on the op, entries are registers,
    /// basic-block ids, or immediate payloads.
    pub operands: Vec<u32>,
    /// Offset of each instruction's slice in `operand_types`.
    pub type_tag_starts: Vec<u32>,
    pub type_tag_counts: Vec<u32>,
    /// Flat slab of per-instruction type tags.
    pub operand_types: Vec<IrOp>,
    /// Owning basic block of each instruction.
    pub bb_indices: Vec<u32>,

    pub mem_ops: MemOps,
    pub immediate_ops: ImmediateOps,
}

impl InstructionList {
    pub fn new() -> Self {
        InstructionList::default()
    }

    pub fn reserve(&mut self, n: usize) {
        self.ops.reserve(n);
        self.destinations.reserve(n);
        self.operand_starts.reserve(n);
        self.operand_counts.reserve(n);
        self.operands.reserve(n * 2);
        self.bb_indices.reserve(n);
    }

    /// Number of instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operand slice of instruction `index`.
    #[inline]
    pub fn operands_of(&self, index: usize) -> &[u32] {
        let start = self.operand_starts[index] as usize;
        let count = self.operand_counts[index] as usize;
        &self.operands[start..start + count]
    }

    /// Type tag slice of instruction `index` (empty for most ops).
    #[inline]
    pub fn type_tags_of(&self, index: usize) -> &[IrOp] {
        let start = self.type_tag_starts[index] as usize;
        let count = self.type_tag_counts[index] as usize;
        &self.operand_types[start..start + count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_slices_resolve() {
        let mut list = InstructionList::new();
        list.ops.push(IrOp::OpAdd);
        list.destinations.push(2);
        list.operand_starts.push(0);
        list.operand_counts.push(2);
        list.operands.extend_from_slice(&[0, 1]);
        list.type_tag_starts.push(0);
        list.type_tag_counts.push(0);
        list.bb_indices.push(0);

        assert_eq!(list.operands_of(0), &[0, 1]);
        assert!(list.type_tags_of(0).is_empty());
    }
}
