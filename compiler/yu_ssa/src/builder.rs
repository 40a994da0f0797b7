//! Append-only SSA IR builder.
//!
//! Instructions can only be appended while a current function and
//! current basic block are set. Violating a precondition (no current
//! block, mutating sealed IR, non-contiguous block fill) is a
//! programming error and panics.
//!
//! # Register numbering
//!
//! Registers are per-function: parameters occupy `[0, param_count)` and
//! instruction destinations continue monotonically from there.

use yu_ir::{BlockList, FunctionList, InstructionList, IrOp, INVALID_INDEX};

/// Append-only builder over the columnar IR tables.
pub struct IrBuilder {
    sealed: bool,
    current_function: u32,
    current_bb: u32,
    next_reg: u32,

    instructions: InstructionList,
    blocks: BlockList,
    functions: FunctionList,
}

impl IrBuilder {
    /// Create a builder with room for roughly `initial_capacity`
    /// instructions.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        let mut instructions = InstructionList::new();
        instructions.reserve(initial_capacity);
        IrBuilder {
            sealed: false,
            current_function: INVALID_INDEX,
            current_bb: INVALID_INDEX,
            next_reg: 0,
            instructions,
            blocks: BlockList::new(),
            functions: FunctionList::new(),
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Append a function and make it current. Resets the block cursor and
    /// seeds the register counter with the parameter count.
    pub fn create_function(
        &mut self,
        name: &str,
        param_types: &[IrOp],
        return_type: IrOp,
    ) -> u32 {
        assert!(!self.sealed, "cannot create function after sealing");

        let index = self.functions.len() as u32;
        self.functions
            .bb_start_indices
            .push(self.blocks.len() as u32);
        self.functions.bb_counts.push(0);
        self.functions
            .param_type_starts
            .push(self.functions.param_types.len() as u32);
        self.functions.param_counts.push(param_types.len() as u32);
        self.functions.param_types.extend_from_slice(param_types);
        self.functions.return_types.push(return_type);
        self.functions.names.push(name.to_string());

        self.current_function = index;
        self.current_bb = INVALID_INDEX;
        self.next_reg = param_types.len() as u32;
        index
    }

    /// Append a basic block to the current function and make it current.
    pub fn create_bb(&mut self) -> u32 {
        assert!(!self.sealed, "cannot create basic block after sealing");
        assert!(
            self.current_function != INVALID_INDEX,
            "must create function before basic block"
        );

        let index = self.blocks.len() as u32;
        self.blocks.start_indices.push(INVALID_INDEX);
        self.blocks.instruction_counts.push(0);
        self.functions.bb_counts[self.current_function as usize] += 1;

        self.current_bb = index;
        index
    }

    /// Reposition the block cursor onto an already-created block.
    pub fn set_current_bb(&mut self, bb_index: u32) {
        assert!(!self.sealed, "cannot set basic block after sealing");
        assert!(
            (bb_index as usize) < self.blocks.len(),
            "basic block {bb_index} does not exist"
        );
        self.current_bb = bb_index;
    }

    /// Append an instruction to the current block.
    ///
    /// Returns the destination register (the next free register of the
    /// current function). Operand meaning depends on the op: registers
    /// for value operands, block ids for control-flow targets, immediate
    /// payloads for type constructors.
    pub fn add_instruction(&mut self, op: IrOp, operands: &[u32]) -> u32 {
        assert!(!self.sealed, "cannot add instruction after sealing");
        assert!(
            self.current_function != INVALID_INDEX,
            "must create function before adding instructions"
        );
        assert!(
            self.current_bb != INVALID_INDEX,
            "must create basic block before adding instructions"
        );

        let inst_index = self.instructions.len() as u32;
        let bb = self.current_bb as usize;

        // A block's instructions form one contiguous range.
        if self.blocks.start_indices[bb] == INVALID_INDEX {
            self.blocks.start_indices[bb] = inst_index;
        } else {
            let expected = self.blocks.start_indices[bb] + self.blocks.instruction_counts[bb];
            assert!(
                expected == inst_index,
                "basic block {bb} must be filled contiguously"
            );
        }
        self.blocks.instruction_counts[bb] += 1;

        let dest = self.next_reg;
        self.next_reg += 1;

        self.instructions.ops.push(op);
        self.instructions.destinations.push(dest);
        self.instructions
            .operand_starts
            .push(self.instructions.operands.len() as u32);
        self.instructions.operand_counts.push(operands.len() as u32);
        self.instructions.operands.extend_from_slice(operands);
        self.instructions
            .type_tag_starts
            .push(self.instructions.operand_types.len() as u32);
        self.instructions.type_tag_counts.push(0);
        self.instructions.bb_indices.push(self.current_bb);

        if op.is_type_constructor() && !operands.is_empty() {
            self.instructions
                .immediate_ops
                .instruction_indices
                .push(inst_index);
            self.instructions
                .immediate_ops
                .values
                .push(operands[0] as i64);
        }

        dest
    }

    /// Append a conversion, recording its `(from, to)` type tags.
    pub fn add_conversion(
        &mut self,
        op: IrOp,
        operands: &[u32],
        from_type: IrOp,
        to_type: IrOp,
    ) -> u32 {
        let dest = self.add_instruction(op, operands);
        let last = self.instructions.len() - 1;
        self.instructions.operand_types.push(from_type);
        self.instructions.operand_types.push(to_type);
        self.instructions.type_tag_counts[last] = 2;
        dest
    }

    /// Append a memory op, recording its value type tag and an addressing
    /// descriptor (plain base-register access).
    pub fn add_memory_op(&mut self, op: IrOp, operands: &[u32], value_type: IrOp) -> u32 {
        let dest = self.add_instruction(op, operands);
        let last = self.instructions.len() - 1;
        self.instructions.operand_types.push(value_type);
        self.instructions.type_tag_counts[last] = 1;

        self.instructions.mem_ops.instruction_indices.push(last as u32);
        self.instructions
            .mem_ops
            .base_regs
            .push(operands.first().copied().unwrap_or(0));
        self.instructions.mem_ops.offsets.push(0);
        self.instructions.mem_ops.index_regs.push(INVALID_INDEX);
        self.instructions.mem_ops.scales.push(1);
        dest
    }

    /// Freeze the IR: derive block edges from terminators and flatten the
    /// successor/predecessor slabs. Subsequent mutations panic.
    pub fn seal(&mut self) {
        if self.sealed {
            return;
        }

        let block_count = self.blocks.len();
        let mut succ_lists: Vec<Vec<u32>> = vec![Vec::new(); block_count];
        let mut pred_lists: Vec<Vec<u32>> = vec![Vec::new(); block_count];

        for i in 0..self.instructions.len() {
            let from = self.instructions.bb_indices[i];
            let operands = self.instructions.operands_of(i);
            let targets: &[u32] = match self.instructions.ops[i] {
                IrOp::FlowJump => &operands[..1.min(operands.len())],
                IrOp::FlowBranch if operands.len() >= 3 => &operands[1..3],
                // switch: value, default target, (case value, target) pairs
                IrOp::FlowSwitch if operands.len() >= 2 => &operands[1..2],
                _ => &[],
            };
            let mut push_edge = |to: u32| {
                if (to as usize) < block_count {
                    succ_lists[from as usize].push(to);
                    pred_lists[to as usize].push(from);
                }
            };
            for &t in targets {
                push_edge(t);
            }
            if self.instructions.ops[i] == IrOp::FlowSwitch && operands.len() > 2 {
                for pair in operands[2..].chunks_exact(2) {
                    push_edge(pair[1]);
                }
            }
        }

        for bb in 0..block_count {
            // Empty blocks get a valid (empty) instruction range.
            if self.blocks.start_indices[bb] == INVALID_INDEX {
                self.blocks.start_indices[bb] = self.instructions.len() as u32;
            }
            self.blocks
                .successor_starts
                .push(self.blocks.successors.len() as u32);
            self.blocks
                .successor_counts
                .push(succ_lists[bb].len() as u32);
            self.blocks.successors.extend_from_slice(&succ_lists[bb]);

            self.blocks
                .predecessor_starts
                .push(self.blocks.predecessors.len() as u32);
            self.blocks
                .predecessor_counts
                .push(pred_lists[bb].len() as u32);
            self.blocks.predecessors.extend_from_slice(&pred_lists[bb]);
        }

        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn instructions(&self) -> &InstructionList {
        &self.instructions
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    pub fn functions(&self) -> &FunctionList {
        &self.functions
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}
