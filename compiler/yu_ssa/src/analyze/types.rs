//! Type validation over sealed IR.
//!
//! Walks each function's instructions maintaining a per-register type,
//! seeded from the function signature. Integer and float widening follow
//! the type-tag declaration order; comparisons produce `bool`; the
//! pointee type of loads is currently erased to `void`.

use super::{is_register_operand, IrAnalyzer};
use tracing::warn;
use yu_ir::IrOp;

impl IrAnalyzer<'_> {
    pub fn validate_type(&self) -> bool {
        let instrs = self.ir.instructions();
        let blocks = self.ir.blocks();
        let functions = self.ir.functions();

        for func in 0..functions.len() {
            let bb_range = functions.block_range(func);
            let reg_count = self.function_reg_count(func) as usize;
            let return_type = functions.return_types[func];

            let mut reg_types: Vec<Option<IrOp>> = vec![None; reg_count];
            for (reg, &ty) in functions.param_types_of(func).iter().enumerate() {
                reg_types[reg] = Some(ty);
            }

            for bb in bb_range.clone() {
                let start = blocks.start_indices[bb as usize] as usize;
                let count = blocks.instruction_counts[bb as usize] as usize;

                for inst in start..start + count {
                    let op = instrs.ops[inst];
                    let dest = instrs.destinations[inst] as usize;
                    let operands = instrs.operands_of(inst);

                    if op.is_type_constructor() {
                        reg_types[dest] = Some(op);
                        continue;
                    }

                    // Types of the register operands, in position order.
                    let mut operand_types = Vec::with_capacity(operands.len());
                    let mut ok = true;
                    for (pos, &operand) in operands.iter().enumerate() {
                        if !is_register_operand(op, pos) {
                            continue;
                        }
                        match reg_types.get(operand as usize).copied().flatten() {
                            Some(ty) => operand_types.push(ty),
                            None => {
                                warn!(inst, operand, "use of untyped register");
                                ok = false;
                                break;
                            }
                        }
                    }
                    if !ok {
                        return false;
                    }

                    match op {
                        op if op.is_int_arith() => {
                            if operand_types.len() != 2 {
                                warn!(inst, "arithmetic op requires two operands");
                                return false;
                            }
                            if !operand_types.iter().all(|t| t.is_integer_type()) {
                                warn!(inst, "integer type required for arithmetic op");
                                return false;
                            }
                            reg_types[dest] = Some(operand_types[0].widen(operand_types[1]));
                        }
                        IrOp::OpNeg | IrOp::OpNot => {
                            if operand_types.len() != 1 || !operand_types[0].is_integer_type() {
                                warn!(inst, "unary op requires one integer operand");
                                return false;
                            }
                            reg_types[dest] = Some(operand_types[0]);
                        }
                        op if op.is_float_arith() => {
                            if operand_types.len() != 2 {
                                warn!(inst, "float op requires two operands");
                                return false;
                            }
                            if !operand_types.iter().all(|t| t.is_float_type()) {
                                warn!(inst, "float type required for float op");
                                return false;
                            }
                            reg_types[dest] = Some(operand_types[0].widen(operand_types[1]));
                        }
                        IrOp::OpAnd | IrOp::OpOr | IrOp::OpXor => {
                            if operand_types.len() != 2
                                || !operand_types.iter().all(|t| t.is_integer_type())
                            {
                                warn!(inst, "bitwise op requires two integer operands");
                                return false;
                            }
                            reg_types[dest] = Some(operand_types[0].widen(operand_types[1]));
                        }
                        IrOp::OpShl | IrOp::OpShr | IrOp::OpSar => {
                            if operand_types.len() != 2
                                || !operand_types.iter().all(|t| t.is_integer_type())
                            {
                                warn!(inst, "shift requires two integer operands");
                                return false;
                            }
                            reg_types[dest] = Some(operand_types[0]);
                        }
                        op if op.is_int_cmp() => {
                            if operand_types.len() != 2
                                || !operand_types.iter().all(|t| t.is_integer_type())
                            {
                                warn!(inst, "integer comparison requires two integer operands");
                                return false;
                            }
                            reg_types[dest] = Some(IrOp::TypeBool);
                        }
                        op if op.is_float_cmp() => {
                            if operand_types.len() != 2
                                || !operand_types.iter().all(|t| t.is_float_type())
                            {
                                warn!(inst, "float comparison requires two float operands");
                                return false;
                            }
                            reg_types[dest] = Some(IrOp::TypeBool);
                        }
                        IrOp::FlowBranch => {
                            if operands.len() != 3 {
                                warn!(inst, "branch requires condition and two target blocks");
                                return false;
                            }
                            if operand_types.first() != Some(&IrOp::TypeBool) {
                                warn!(inst, "branch condition must be boolean");
                                return false;
                            }
                            if !bb_range.contains(&operands[1]) || !bb_range.contains(&operands[2])
                            {
                                warn!(inst, "branch targets must be block indices");
                                return false;
                            }
                        }
                        IrOp::FlowJump => {
                            if operands.len() != 1 || !bb_range.contains(&operands[0]) {
                                warn!(inst, "jump requires one in-range target block");
                                return false;
                            }
                        }
                        IrOp::FlowReturn => match operand_types.first() {
                            Some(&ty) => {
                                if operands.len() != 1 {
                                    warn!(inst, "return takes at most one value");
                                    return false;
                                }
                                if ty != return_type {
                                    warn!(inst, "return type mismatch");
                                    return false;
                                }
                            }
                            None => {
                                if return_type != IrOp::TypeVoid {
                                    warn!(inst, "missing return value");
                                    return false;
                                }
                            }
                        },
                        IrOp::FlowUnreachable | IrOp::SsaUnreachable => {}
                        IrOp::SsaPhi => {
                            if operands.len() < 2 || operands.len() % 2 != 0 {
                                warn!(inst, "invalid phi operand count");
                                return false;
                            }
                            let phi_type = operand_types[0];
                            if operand_types.iter().any(|&t| t != phi_type) {
                                warn!(inst, "inconsistent types in phi node");
                                return false;
                            }
                            for pair in operands.chunks_exact(2) {
                                if !bb_range.contains(&pair[1]) {
                                    warn!(inst, "phi predecessor must be a block index");
                                    return false;
                                }
                            }
                            reg_types[dest] = Some(phi_type);
                        }
                        IrOp::MemLoad => {
                            if operand_types.len() != 1 {
                                warn!(inst, "load requires exactly one pointer operand");
                                return false;
                            }
                            if !operand_types[0].is_pointer_type() {
                                warn!(inst, "load requires pointer operand");
                                return false;
                            }
                            // Pointee type is erased for now.
                            reg_types[dest] = Some(IrOp::TypeVoid);
                        }
                        IrOp::MemStore => {
                            if operand_types.len() != 2 {
                                warn!(inst, "store requires pointer and value operands");
                                return false;
                            }
                            if !operand_types[0].is_pointer_type() {
                                warn!(inst, "store first operand must be pointer");
                                return false;
                            }
                        }
                        IrOp::MemAlloc => {
                            reg_types[dest] = Some(IrOp::TypePtr);
                        }
                        IrOp::MemFree => {
                            if operand_types.len() != 1 || !operand_types[0].is_pointer_type() {
                                warn!(inst, "free requires one pointer operand");
                                return false;
                            }
                        }
                        IrOp::ConvZext | IrOp::ConvSext => {
                            if !self.check_sized_conversion(inst, &operand_types, true) {
                                return false;
                            }
                            reg_types[dest] = Some(instrs.type_tags_of(inst)[1]);
                        }
                        IrOp::ConvTrunc => {
                            if !self.check_sized_conversion(inst, &operand_types, false) {
                                return false;
                            }
                            reg_types[dest] = Some(instrs.type_tags_of(inst)[1]);
                        }
                        op if op.is_conversion() => {
                            if operand_types.len() != 1 {
                                warn!(inst, "conversion requires one operand");
                                return false;
                            }
                            let tags = instrs.type_tags_of(inst);
                            reg_types[dest] = Some(
                                tags.get(1).copied().unwrap_or(operand_types[0]),
                            );
                        }
                        _ => {
                            // Memory orderings, barriers, intrinsics, sync
                            // primitives, undef, and calls carry no checked
                            // type rule yet; the destination takes the
                            // recorded value type when one is present.
                            let tags = instrs.type_tags_of(inst);
                            reg_types[dest] =
                                Some(tags.first().copied().unwrap_or(IrOp::TypeVoid));
                        }
                    }
                }
            }
        }

        true
    }

    /// Shared rule for zext/sext (widening) and trunc (narrowing):
    /// one integer operand and a strictly wider/narrower destination.
    fn check_sized_conversion(&self, inst: usize, operand_types: &[IrOp], widening: bool) -> bool {
        let instrs = self.ir.instructions();
        if operand_types.len() != 1 {
            warn!(inst, "conversion requires one operand");
            return false;
        }
        if !operand_types[0].is_integer_type() {
            warn!(inst, "conversion requires integer operand");
            return false;
        }
        let tags = instrs.type_tags_of(inst);
        if tags.len() != 2 {
            warn!(inst, "conversion is missing its type tags");
            return false;
        }
        let from_size = operand_types[0].type_size();
        let to_size = tags[1].type_size();
        let valid = if widening {
            to_size > from_size
        } else {
            to_size < from_size
        };
        if !valid {
            warn!(
                inst,
                widening, "conversion destination size violates the direction rule"
            );
            return false;
        }
        true
    }
}
