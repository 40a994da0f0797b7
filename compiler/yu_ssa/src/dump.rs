//! Human-readable pretty-print of the IR.
//!
//! One function per `func (...) -> TY:` header, `bb<n>:` labels with
//! block ids relative to the function's start block, and one instruction
//! per line indented four spaces.

use crate::IrBuilder;
use std::fmt::Write;
use yu_ir::IrOp;

impl IrBuilder {
    /// Render the whole module as text.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let instrs = self.instructions();
        let blocks = self.blocks();
        let functions = self.functions();

        // Types of registers materialized by type constructors, for phi
        // annotations.
        let max_reg = instrs.destinations.iter().max().copied().unwrap_or(0) as usize;
        let mut reg_types: Vec<Option<IrOp>> = vec![None; max_reg + 1];

        for func in 0..functions.len() {
            let _ = write!(out, "func (");
            for (i, ty) in functions.param_types_of(func).iter().enumerate() {
                if i > 0 {
                    let _ = write!(out, ", ");
                }
                let _ = write!(out, "%p{i}: {ty}");
            }
            let _ = writeln!(out, ") -> {}:", functions.return_types[func]);

            let bb_range = functions.block_range(func);
            let bb_base = bb_range.start;
            for bb in bb_range {
                let _ = writeln!(out, "bb{}:", bb - bb_base);

                let start = blocks.start_indices[bb as usize] as usize;
                let count = blocks.instruction_counts[bb as usize] as usize;
                for inst in start..start + count {
                    let op = instrs.ops[inst];
                    let dest = instrs.destinations[inst];
                    let operands = instrs.operands_of(inst);
                    if op.is_type_constructor() {
                        if (dest as usize) < reg_types.len() {
                            reg_types[dest as usize] = Some(op);
                        }
                        let _ = write!(out, "    %{dest} = {op}");
                        if let Some(&imm) = operands.first() {
                            let _ = write!(out, " {imm}");
                        }
                        let _ = writeln!(out);
                        continue;
                    }

                    let _ = write!(out, "    ");
                    match op {
                        IrOp::FlowBranch => {
                            let _ = write!(
                                out,
                                "br %{}, bb{}, bb{}",
                                operands[0],
                                operands[1] - bb_base,
                                operands[2] - bb_base
                            );
                        }
                        IrOp::FlowJump => {
                            let _ = write!(out, "jump bb{}", operands[0] - bb_base);
                        }
                        IrOp::FlowReturn => {
                            let _ = write!(out, "ret");
                            if let Some(&value) = operands.first() {
                                let _ = write!(out, " %{value}");
                            }
                        }
                        IrOp::FlowUnreachable | IrOp::SsaUnreachable => {
                            let _ = write!(out, "unreachable");
                        }
                        IrOp::SsaPhi => {
                            let phi_type = operands
                                .first()
                                .and_then(|&v| reg_types.get(v as usize).copied().flatten())
                                .unwrap_or(IrOp::TypeI32);
                            let _ = write!(out, "%{dest} = phi {phi_type} [");
                            for (i, pair) in operands.chunks_exact(2).enumerate() {
                                if i > 0 {
                                    let _ = write!(out, ", ");
                                }
                                let _ =
                                    write!(out, "%{}, bb{}", pair[0], pair[1] - bb_base);
                            }
                            let _ = write!(out, "]");
                        }
                        IrOp::MemStore => {
                            let _ = write!(out, "store %{}, %{}", operands[0], operands[1]);
                        }
                        IrOp::MemLoad => {
                            let _ = write!(out, "%{dest} = load %{}", operands[0]);
                        }
                        op if op.is_conversion() => {
                            let tags = instrs.type_tags_of(inst);
                            if let [from, to] = tags {
                                let _ = write!(
                                    out,
                                    "%{dest} = {op} {from} %{} to {to}",
                                    operands[0]
                                );
                            } else {
                                let _ = write!(out, "%{dest} = {op} %{}", operands[0]);
                            }
                        }
                        _ => {
                            let _ = write!(out, "%{dest} = {op}");
                            for (i, &operand) in operands.iter().enumerate() {
                                let sep = if i == 0 { " %" } else { ", %" };
                                let _ = write!(out, "{sep}{operand}");
                            }
                        }
                    }
                    let _ = writeln!(out);
                }
                let _ = writeln!(out);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_arithmetic_function() {
        let mut b = IrBuilder::new();
        b.create_function("main", &[], IrOp::TypeI32);
        b.create_bb();
        let a = b.add_instruction(IrOp::TypeI32, &[10]);
        let c = b.add_instruction(IrOp::TypeI32, &[5]);
        let sum = b.add_instruction(IrOp::OpAdd, &[a, c]);
        b.add_instruction(IrOp::FlowReturn, &[sum]);

        let text = b.dump();
        assert!(text.contains("func () -> i32:"), "{text}");
        assert!(text.contains("bb0:"), "{text}");
        assert!(text.contains("%0 = i32 10"), "{text}");
        assert!(text.contains("%2 = add %0, %1"), "{text}");
        assert!(text.contains("ret %2"), "{text}");
    }

    #[test]
    fn dump_branch_phi_and_jump() {
        let mut b = IrBuilder::new();
        b.create_function("sel", &[], IrOp::TypeI32);
        let entry = b.create_bb();
        let _ = entry;
        let x = b.add_instruction(IrOp::TypeI32, &[5]);
        let y = b.add_instruction(IrOp::TypeI32, &[10]);
        let cmp = b.add_instruction(IrOp::OpLt, &[x, y]);
        b.add_instruction(IrOp::FlowBranch, &[cmp, 1, 2]);
        b.create_bb();
        let t = b.add_instruction(IrOp::TypeI32, &[42]);
        b.add_instruction(IrOp::FlowJump, &[3]);
        b.create_bb();
        let e = b.add_instruction(IrOp::TypeI32, &[24]);
        b.add_instruction(IrOp::FlowJump, &[3]);
        b.create_bb();
        let phi = b.add_instruction(IrOp::SsaPhi, &[t, 1, e, 2]);
        b.add_instruction(IrOp::FlowReturn, &[phi]);

        let text = b.dump();
        assert!(text.contains("br %2, bb1, bb2"), "{text}");
        assert!(text.contains("jump bb3"), "{text}");
        assert!(
            text.contains("%8 = phi i32 [%4, bb1, %6, bb2]"),
            "{text}"
        );
        assert!(text.contains("ret %8"), "{text}");
    }

    #[test]
    fn dump_memory_and_conversion_forms() {
        let mut b = IrBuilder::new();
        b.create_function("mem", &[IrOp::TypePtr, IrOp::TypeI32], IrOp::TypeVoid);
        b.create_bb();
        let loaded = b.add_memory_op(IrOp::MemLoad, &[0], IrOp::TypeVoid);
        let _ = loaded;
        b.add_memory_op(IrOp::MemStore, &[0, 1], IrOp::TypeI32);
        b.add_conversion(IrOp::ConvZext, &[1], IrOp::TypeI32, IrOp::TypeI64);
        b.add_instruction(IrOp::FlowReturn, &[]);

        let text = b.dump();
        assert!(text.contains("%2 = load %0"), "{text}");
        assert!(text.contains("store %0, %1"), "{text}");
        assert!(text.contains("%4 = zext i32 %1 to i64"), "{text}");
        assert!(text.contains("ret\n"), "{text}");
    }

    #[test]
    fn dump_params_in_header() {
        let mut b = IrBuilder::new();
        b.create_function("add", &[IrOp::TypeI32, IrOp::TypeI64], IrOp::TypeI64);
        b.create_bb();
        b.add_instruction(IrOp::FlowReturn, &[1]);
        let text = b.dump();
        assert!(text.contains("func (%p0: i32, %p1: i64) -> i64:"), "{text}");
    }
}
