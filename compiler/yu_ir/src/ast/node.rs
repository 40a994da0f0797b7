//! Node kind tags and per-node flag bitsets.

/// Kind tag shared by expression and statement records.
///
/// The tag uniquely selects which auxiliary columns of [`super::ExprList`]
/// or [`super::StmtList`] are meaningful for a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    // Expressions
    Literal,
    Binary,
    Unary,
    Grouping,
    Variable,
    FunctionCall,
    Member,
    Index,

    // Statements
    If,
    While,
    For,
    Block,
    VarDecl,
    FunctionDecl,
    Return,
    ExpressionStmt,
    Switch,
    Break,
    Continue,
    Import,
    ClassDecl,
    EnumDecl,

    GenericParam,
}

/// Expression flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExprFlags(u8);

impl ExprFlags {
    pub const NONE: ExprFlags = ExprFlags(0);
    pub const CONSTANT: ExprFlags = ExprFlags(1 << 0);
    pub const PURE: ExprFlags = ExprFlags(1 << 1);
    pub const EVALUATED: ExprFlags = ExprFlags(1 << 2);
    pub const HAS_SIDE_EFFECTS: ExprFlags = ExprFlags(1 << 3);
    pub const VARIADIC: ExprFlags = ExprFlags(1 << 4);

    #[inline]
    #[must_use]
    pub const fn with(self, other: ExprFlags) -> ExprFlags {
        ExprFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: ExprFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Statement flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StmtFlags(u8);

impl StmtFlags {
    pub const NONE: StmtFlags = StmtFlags(0);
    pub const IS_CONST: StmtFlags = StmtFlags(1 << 0);
    pub const IS_PUBLIC: StmtFlags = StmtFlags(1 << 1);
    pub const IS_STATIC: StmtFlags = StmtFlags(1 << 2);
    pub const IS_ASYNC: StmtFlags = StmtFlags(1 << 3);

    #[inline]
    #[must_use]
    pub const fn with(self, other: StmtFlags) -> StmtFlags {
        StmtFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: StmtFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Size assertion: node tags are a single byte.
const _: () = assert!(std::mem::size_of::<NodeType>() == 1);
