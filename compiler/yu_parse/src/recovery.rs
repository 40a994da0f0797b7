//! Error recovery for the parser.
//!
//! Provides a bitset of token kinds and a synchronization routine that
//! advances to the next statement boundary after an error.

use crate::TokenCursor;
use yu_ir::TokenKind;

/// A set of token kinds using bitset representation for O(1) membership
/// testing. Each bit in the `u128` corresponds to a kind discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

/// All kind discriminants must fit the bitset.
const _: () = assert!(TokenKind::DISCRIMINANT_SPAN <= 128);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a token kind (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind.index()))
    }

    /// Union of two token sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// O(1) membership test.
    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << kind.index())) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Statement starter keywords plus `}`: recovery stops here without
/// consuming, so the next statement parses normally.
pub const STMT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Function)
    .with(TokenKind::Var)
    .with(TokenKind::Const)
    .with(TokenKind::If)
    .with(TokenKind::While)
    .with(TokenKind::For)
    .with(TokenKind::Return)
    .with(TokenKind::Switch)
    .with(TokenKind::Break)
    .with(TokenKind::Continue)
    .with(TokenKind::Class)
    .with(TokenKind::Enum)
    .with(TokenKind::Import)
    .with(TokenKind::RightBrace)
    .with(TokenKind::Eof);

/// Advance until the next `;` (consumed) or a statement boundary
/// (not consumed). Returns `true` unless EOF was reached.
pub fn synchronize(cursor: &mut TokenCursor<'_>) -> bool {
    while !cursor.at_end() {
        if cursor.check(TokenKind::Semicolon) {
            cursor.advance();
            return true;
        }
        if STMT_BOUNDARY.contains(cursor.current_kind()) {
            return true;
        }
        cursor.advance();
    }
    false
}
