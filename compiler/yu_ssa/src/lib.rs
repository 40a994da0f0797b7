//! SSA IR construction and validation.
//!
//! [`IrBuilder`] is an append-only builder with an explicit current
//! function and current basic block cursor. After [`IrBuilder::seal`],
//! the IR is immutable; [`IrAnalyzer`] provides structural, type, and
//! control-flow validation plus dominator/liveness/loop scaffolds and
//! def-use chains over the sealed tables.

mod analyze;
mod builder;
mod dump;

pub use analyze::{DefUseInfo, DominatorInfo, IrAnalyzer, LivenessInfo, LoopInfo};
pub use builder::IrBuilder;
