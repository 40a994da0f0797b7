//! Read-only analysis over sealed IR.
//!
//! Three validation predicates ([`IrAnalyzer::validate_ssa`],
//! [`IrAnalyzer::validate_type`], [`IrAnalyzer::validate_control_flow`])
//! and three dataflow products (dominators, liveness, natural loops),
//! plus def-use chains. Validators return a boolean verdict and log the
//! first offending rule.

mod def_use;
mod dominators;
mod flow;
mod liveness;
mod loops;
mod ssa;
mod types;

pub use def_use::DefUseInfo;
pub use dominators::DominatorInfo;
pub use liveness::LivenessInfo;
pub use loops::LoopInfo;

use crate::IrBuilder;
use yu_ir::IrOp;

/// Analyzer borrowing a sealed IR.
pub struct IrAnalyzer<'ir> {
    pub(crate) ir: &'ir IrBuilder,
}

impl<'ir> IrAnalyzer<'ir> {
    /// Create an analyzer over a sealed builder.
    ///
    /// # Panics
    ///
    /// Panics if the builder has not been sealed.
    pub fn new(builder: &'ir IrBuilder) -> Self {
        assert!(builder.is_sealed(), "analyzer requires sealed IR");
        IrAnalyzer { ir: builder }
    }

    /// Run all three validators.
    pub fn validate(&self) -> bool {
        self.validate_ssa() && self.validate_type() && self.validate_control_flow()
    }

    /// Total register count of a function: parameters plus one
    /// destination per instruction.
    pub(crate) fn function_reg_count(&self, func: usize) -> u32 {
        let blocks = self.ir.blocks();
        let instr_count: u32 = self
            .ir
            .functions()
            .block_range(func)
            .map(|bb| blocks.instruction_counts[bb as usize])
            .sum();
        self.ir.functions().param_counts[func] + instr_count
    }
}

/// Whether operand `position` of `op` is a register use.
///
/// Block-id operands (branch/jump/switch targets, phi predecessors),
/// type-constructor immediates, and direct-call callee ids are not
/// register uses.
pub(crate) fn is_register_operand(op: IrOp, position: usize) -> bool {
    match op {
        t if t.is_type_constructor() => false,
        IrOp::FlowJump => false,
        IrOp::FlowBranch | IrOp::FlowSwitch => position == 0,
        IrOp::SsaPhi => position % 2 == 0,
        IrOp::CallDirect | IrOp::CallTail => position != 0,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_classification() {
        assert!(!is_register_operand(IrOp::TypeI32, 0));
        assert!(!is_register_operand(IrOp::FlowJump, 0));
        assert!(is_register_operand(IrOp::FlowBranch, 0));
        assert!(!is_register_operand(IrOp::FlowBranch, 1));
        assert!(!is_register_operand(IrOp::FlowBranch, 2));
        assert!(is_register_operand(IrOp::SsaPhi, 0));
        assert!(!is_register_operand(IrOp::SsaPhi, 1));
        assert!(is_register_operand(IrOp::SsaPhi, 2));
        assert!(!is_register_operand(IrOp::CallDirect, 0));
        assert!(is_register_operand(IrOp::CallDirect, 1));
        assert!(is_register_operand(IrOp::OpAdd, 0));
        assert!(is_register_operand(IrOp::OpAdd, 1));
    }

    #[test]
    #[should_panic(expected = "requires sealed IR")]
    fn analyzer_rejects_unsealed_ir() {
        let builder = IrBuilder::new();
        let _ = IrAnalyzer::new(&builder);
    }
}
