//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and the adjacency checks
//! used to synthesize compound operators from single-character tokens.

use yu_ir::{Token, TokenKind, TokenList};

/// Cursor over a columnar token list.
///
/// The position is always valid: the list ends in EOF and the cursor
/// never advances past it.
pub struct TokenCursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(
            !tokens.is_empty() && tokens.kinds()[tokens.len() - 1] == TokenKind::Eof,
            "token list must be EOF-terminated"
        );
        TokenCursor { tokens, pos: 0 }
    }

    /// Current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current token record.
    #[inline]
    pub fn current(&self) -> Token {
        self.tokens.get(self.pos)
    }

    /// Current token's kind, a single byte load from the kind column.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.tokens.kinds()[self.pos]
    }

    /// Kind of the token `n` ahead; EOF when looking past the end.
    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens.kinds()[idx]
    }

    /// Check if at the end of the stream.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Advance one token, clamping at EOF.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Check the current token's kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token if it matches.
    #[inline]
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        let matches = self.check(kind);
        if matches {
            self.advance();
        }
        matches
    }

    /// Check for `first` immediately followed by `second` with no bytes
    /// between them. Used to synthesize `>> >= == != <= << && ||` in
    /// expression context while leaving `> >` usable to close nested
    /// generics.
    pub fn adjacent_pair(&self, first: TokenKind, second: TokenKind) -> bool {
        self.current_kind() == first
            && self.peek_kind(1) == second
            && self
                .current()
                .span()
                .touches(self.tokens.get(self.pos + 1).span())
    }

    /// Check for three consecutive `.` tokens (the variadic marker).
    pub fn at_ellipsis(&self) -> bool {
        self.current_kind() == TokenKind::Dot
            && self.peek_kind(1) == TokenKind::Dot
            && self.peek_kind(2) == TokenKind::Dot
    }
}
