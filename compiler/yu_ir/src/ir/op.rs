//! IR operation tag space.
//!
//! Tags are grouped into ranges; several validator rules are expressed as
//! range checks, and the integer/float widening rule relies on the
//! declaration order of the `Type*` constructors.

use std::fmt;

/// IR operation tag.
///
/// The first group (`TypeVoid..=TypeStruct`) doubles as the type tag
/// space: a register's type is the `Type*` op that materialized or is
/// ascribed to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum IrOp {
    // Primitive type construction / type tags
    TypeVoid,
    TypeBool,
    TypeI8,
    TypeU8,
    TypeI16,
    TypeU16,
    TypeI32,
    TypeU32,
    TypeI64,
    TypeU64,
    TypeF32,
    TypeF64,
    TypePtr,
    TypeArray,
    TypeVector,
    TypeStruct,

    // Memory
    MemAlloc,
    MemLoad,
    MemStore,
    MemAtomicLoad,
    MemAtomicStore,
    MemAtomicAdd,
    MemAtomicSub,
    MemAtomicAnd,
    MemAtomicOr,
    MemAtomicXor,
    MemCmpxchg,
    MemMemcpy,
    MemMemmove,
    MemMemset,
    MemFree,

    // Integer arithmetic
    OpAdd,
    OpSub,
    OpMul,
    OpDiv,
    OpMod,
    OpNeg,

    // Float arithmetic
    OpFadd,
    OpFsub,
    OpFmul,
    OpFdiv,

    // Bitwise
    OpAnd,
    OpOr,
    OpXor,
    OpNot,
    OpShl,
    OpShr,
    OpSar,

    // Integer comparisons
    OpEq,
    OpNe,
    OpLt,
    OpLe,
    OpGt,
    OpGe,

    // Float comparisons
    OpFeq,
    OpFne,
    OpFlt,
    OpFle,
    OpFgt,
    OpFge,

    // Conversions
    ConvZext,
    ConvSext,
    ConvTrunc,
    ConvBitcast,
    ConvIntToPtr,
    ConvPtrToInt,
    ConvFpToInt,
    ConvIntToFp,
    ConvFpExt,
    ConvFpTrunc,

    // Control flow
    FlowJump,
    FlowBranch,
    FlowSwitch,
    FlowReturn,
    FlowInvoke,
    FlowLandingpad,
    FlowUnreachable,

    // Memory orderings
    MoUnordered,
    MoMonotonic,
    MoAcquire,
    MoRelease,
    MoAcqRel,
    MoSeqCst,

    // Barriers
    BarrierFull,
    BarrierAcquire,
    BarrierRelease,

    // SIMD / arch intrinsics
    IntrinsicSimdAdd,
    IntrinsicSimdMul,
    IntrinsicSimdDiv,
    IntrinsicSimdSub,
    IntrinsicX86Rdtsc,
    IntrinsicX86Pause,
    IntrinsicX86Clflush,
    IntrinsicX86Mfence,
    IntrinsicX86Lfence,
    IntrinsicX86Sfence,

    // Sync primitives
    SyncMutexCreate,
    SyncMutexLock,
    SyncMutexUnlock,
    SyncCondvarCreate,
    SyncCondvarWait,
    SyncCondvarSignal,
    SyncCondvarBroadcast,

    // SSA
    SsaPhi,
    SsaUndef,
    SsaUnreachable,

    // Calls
    CallDirect,
    CallIndirect,
    CallTail,
}

impl IrOp {
    /// Returns `true` for the primitive-type construction range.
    #[inline]
    pub const fn is_type_constructor(self) -> bool {
        (self as u8) <= IrOp::TypePtr as u8
    }

    /// Returns `true` for integer type tags (`i8..u64`).
    #[inline]
    pub const fn is_integer_type(self) -> bool {
        let d = self as u8;
        d >= IrOp::TypeI8 as u8 && d <= IrOp::TypeU64 as u8
    }

    /// Returns `true` for float type tags.
    #[inline]
    pub const fn is_float_type(self) -> bool {
        matches!(self, IrOp::TypeF32 | IrOp::TypeF64)
    }

    /// Returns `true` for the pointer type tag.
    #[inline]
    pub const fn is_pointer_type(self) -> bool {
        matches!(self, IrOp::TypePtr)
    }

    /// Returns `true` for integer arithmetic binary ops.
    #[inline]
    pub const fn is_int_arith(self) -> bool {
        matches!(
            self,
            IrOp::OpAdd | IrOp::OpSub | IrOp::OpMul | IrOp::OpDiv | IrOp::OpMod
        )
    }

    /// Returns `true` for float arithmetic binary ops.
    #[inline]
    pub const fn is_float_arith(self) -> bool {
        matches!(self, IrOp::OpFadd | IrOp::OpFsub | IrOp::OpFmul | IrOp::OpFdiv)
    }

    /// Returns `true` for two-operand bitwise ops (`and/or/xor/shl/shr/sar`).
    #[inline]
    pub const fn is_bitwise_binary(self) -> bool {
        matches!(
            self,
            IrOp::OpAnd | IrOp::OpOr | IrOp::OpXor | IrOp::OpShl | IrOp::OpShr | IrOp::OpSar
        )
    }

    /// Returns `true` for integer comparison ops.
    #[inline]
    pub const fn is_int_cmp(self) -> bool {
        let d = self as u8;
        d >= IrOp::OpEq as u8 && d <= IrOp::OpGe as u8
    }

    /// Returns `true` for float comparison ops.
    #[inline]
    pub const fn is_float_cmp(self) -> bool {
        let d = self as u8;
        d >= IrOp::OpFeq as u8 && d <= IrOp::OpFge as u8
    }

    /// Returns `true` for conversion ops.
    #[inline]
    pub const fn is_conversion(self) -> bool {
        let d = self as u8;
        d >= IrOp::ConvZext as u8 && d <= IrOp::ConvFpTrunc as u8
    }

    /// Returns `true` for block terminator ops.
    #[inline]
    pub const fn is_terminator(self) -> bool {
        matches!(
            self,
            IrOp::FlowJump
                | IrOp::FlowBranch
                | IrOp::FlowSwitch
                | IrOp::FlowReturn
                | IrOp::FlowUnreachable
                | IrOp::SsaUnreachable
        )
    }

    /// Size in bytes of a value of this type tag; 0 for non-value tags.
    pub const fn type_size(self) -> u32 {
        match self {
            IrOp::TypeBool | IrOp::TypeI8 | IrOp::TypeU8 => 1,
            IrOp::TypeI16 | IrOp::TypeU16 => 2,
            IrOp::TypeI32 | IrOp::TypeU32 | IrOp::TypeF32 => 4,
            IrOp::TypeI64 | IrOp::TypeU64 | IrOp::TypeF64 | IrOp::TypePtr => 8,
            _ => 0,
        }
    }

    /// Widening rule: the wider of two type tags, by declaration order.
    #[inline]
    pub fn widen(self, other: IrOp) -> IrOp {
        self.max(other)
    }

    /// Mnemonic used by the textual IR dump.
    pub fn mnemonic(self) -> &'static str {
        match self {
            IrOp::TypeVoid => "void",
            IrOp::TypeBool => "bool",
            IrOp::TypeI8 => "i8",
            IrOp::TypeU8 => "u8",
            IrOp::TypeI16 => "i16",
            IrOp::TypeU16 => "u16",
            IrOp::TypeI32 => "i32",
            IrOp::TypeU32 => "u32",
            IrOp::TypeI64 => "i64",
            IrOp::TypeU64 => "u64",
            IrOp::TypeF32 => "f32",
            IrOp::TypeF64 => "f64",
            IrOp::TypePtr => "ptr",
            IrOp::TypeArray => "array",
            IrOp::TypeVector => "vector",
            IrOp::TypeStruct => "struct",
            IrOp::MemAlloc => "alloc",
            IrOp::MemLoad => "load",
            IrOp::MemStore => "store",
            IrOp::MemAtomicLoad => "atomic_load",
            IrOp::MemAtomicStore => "atomic_store",
            IrOp::MemAtomicAdd => "atomic_add",
            IrOp::MemAtomicSub => "atomic_sub",
            IrOp::MemAtomicAnd => "atomic_and",
            IrOp::MemAtomicOr => "atomic_or",
            IrOp::MemAtomicXor => "atomic_xor",
            IrOp::MemCmpxchg => "cmpxchg",
            IrOp::MemMemcpy => "memcpy",
            IrOp::MemMemmove => "memmove",
            IrOp::MemMemset => "memset",
            IrOp::MemFree => "free",
            IrOp::OpAdd => "add",
            IrOp::OpSub => "sub",
            IrOp::OpMul => "mul",
            IrOp::OpDiv => "div",
            IrOp::OpMod => "mod",
            IrOp::OpNeg => "neg",
            IrOp::OpFadd => "fadd",
            IrOp::OpFsub => "fsub",
            IrOp::OpFmul => "fmul",
            IrOp::OpFdiv => "fdiv",
            IrOp::OpAnd => "and",
            IrOp::OpOr => "or",
            IrOp::OpXor => "xor",
            IrOp::OpNot => "not",
            IrOp::OpShl => "shl",
            IrOp::OpShr => "shr",
            IrOp::OpSar => "sar",
            IrOp::OpEq => "eq",
            IrOp::OpNe => "ne",
            IrOp::OpLt => "lt",
            IrOp::OpLe => "le",
            IrOp::OpGt => "gt",
            IrOp::OpGe => "ge",
            IrOp::OpFeq => "feq",
            IrOp::OpFne => "fne",
            IrOp::OpFlt => "flt",
            IrOp::OpFle => "fle",
            IrOp::OpFgt => "fgt",
            IrOp::OpFge => "fge",
            IrOp::ConvZext => "zext",
            IrOp::ConvSext => "sext",
            IrOp::ConvTrunc => "trunc",
            IrOp::ConvBitcast => "bitcast",
            IrOp::ConvIntToPtr => "inttoptr",
            IrOp::ConvPtrToInt => "ptrtoint",
            IrOp::ConvFpToInt => "fptoint",
            IrOp::ConvIntToFp => "inttofp",
            IrOp::ConvFpExt => "fpext",
            IrOp::ConvFpTrunc => "fptrunc",
            IrOp::FlowJump => "jump",
            IrOp::FlowBranch => "br",
            IrOp::FlowSwitch => "switch",
            IrOp::FlowReturn => "ret",
            IrOp::FlowInvoke => "invoke",
            IrOp::FlowLandingpad => "landingpad",
            IrOp::FlowUnreachable => "unreachable",
            IrOp::MoUnordered => "unordered",
            IrOp::MoMonotonic => "monotonic",
            IrOp::MoAcquire => "acquire",
            IrOp::MoRelease => "release",
            IrOp::MoAcqRel => "acq_rel",
            IrOp::MoSeqCst => "seq_cst",
            IrOp::BarrierFull => "barrier",
            IrOp::BarrierAcquire => "barrier_acquire",
            IrOp::BarrierRelease => "barrier_release",
            IrOp::IntrinsicSimdAdd => "simd_add",
            IrOp::IntrinsicSimdMul => "simd_mul",
            IrOp::IntrinsicSimdDiv => "simd_div",
            IrOp::IntrinsicSimdSub => "simd_sub",
            IrOp::IntrinsicX86Rdtsc => "x86_rdtsc",
            IrOp::IntrinsicX86Pause => "x86_pause",
            IrOp::IntrinsicX86Clflush => "x86_clflush",
            IrOp::IntrinsicX86Mfence => "x86_mfence",
            IrOp::IntrinsicX86Lfence => "x86_lfence",
            IrOp::IntrinsicX86Sfence => "x86_sfence",
            IrOp::SyncMutexCreate => "mutex_create",
            IrOp::SyncMutexLock => "mutex_lock",
            IrOp::SyncMutexUnlock => "mutex_unlock",
            IrOp::SyncCondvarCreate => "condvar_create",
            IrOp::SyncCondvarWait => "condvar_wait",
            IrOp::SyncCondvarSignal => "condvar_signal",
            IrOp::SyncCondvarBroadcast => "condvar_broadcast",
            IrOp::SsaPhi => "phi",
            IrOp::SsaUndef => "undef",
            IrOp::SsaUnreachable => "unreachable",
            IrOp::CallDirect => "call",
            IrOp::CallIndirect => "call_indirect",
            IrOp::CallTail => "tail_call",
        }
    }
}

impl fmt::Display for IrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Size assertion: op tags are a single byte.
const _: () = assert!(std::mem::size_of::<IrOp>() == 1);
