//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances byte-by-byte. EOF is when the current byte equals
//! the sentinel (`0x00`) and the position has reached the source length;
//! interior null bytes are distinguished by position. No explicit bounds
//! checking is needed in the common case, the sentinel guarantees safe
//! termination.

/// Count leading whitespace bytes (space or tab) with a scalar loop.
///
/// Reference implementation for property testing against the SWAR version.
#[cfg(test)]
fn scalar_count_whitespace(buf: &[u8]) -> usize {
    buf.iter().take_while(|&&b| b == b' ' || b == b'\t').count()
}

/// Count leading whitespace bytes (space `0x20` or tab `0x09`) using SWAR.
///
/// Processes 8 bytes at a time by loading them as a little-endian `u64`
/// and using carry-free zero-byte detection to find the first
/// non-whitespace byte. Falls back to scalar for the 0-7 byte tail.
#[allow(unsafe_code)]
fn swar_count_whitespace(buf: &[u8]) -> usize {
    /// High bit set in each byte lane of `v` that is zero.
    ///
    /// Carry-free: masks each byte to 7 bits, adds `0x7F` per lane (max
    /// `0xFE`, no carry across lanes), ORs with the original to catch
    /// `0x80`, then inverts.
    #[inline]
    const fn byte_zero_mask(v: u64) -> u64 {
        const LO7: u64 = 0x7F7F_7F7F_7F7F_7F7F;
        const HI: u64 = 0x8080_8080_8080_8080;
        !((v & LO7).wrapping_add(LO7) | v) & HI
    }

    const SPACES: u64 = 0x2020_2020_2020_2020;
    const TABS: u64 = 0x0909_0909_0909_0909;
    const HI: u64 = 0x8080_8080_8080_8080;

    let len = buf.len();
    let mut i = 0;

    while i + 8 <= len {
        // SAFETY: `i + 8 <= len` keeps the read in bounds; the cursor
        // position is not 8-byte aligned, hence read_unaligned.
        let chunk = unsafe { buf.as_ptr().add(i).cast::<u64>().read_unaligned() };

        let ws_mask = byte_zero_mask(chunk ^ SPACES) | byte_zero_mask(chunk ^ TABS);
        let non_ws = !ws_mask & HI;
        if non_ws != 0 {
            return i + (non_ws.trailing_zeros() as usize / 8);
        }
        i += 8;
    }

    while i < len {
        let b = buf[i];
        if b != b' ' && b != b'\t' {
            return i;
        }
        i += 1;
    }

    i
}

/// Count leading ASCII digit bytes using SWAR.
///
/// Uses the classic range test: `chunk - 0x30...` underflows lanes below
/// `'0'`, `chunk + 0x46...` overflows lanes above `'9'`; either sets the
/// lane's high bit.
#[allow(unsafe_code)]
fn swar_count_digits(buf: &[u8]) -> usize {
    const ZEROS: u64 = 0x3030_3030_3030_3030;
    const ABOVE_NINE: u64 = 0x4646_4646_4646_4646;
    const HI: u64 = 0x8080_8080_8080_8080;

    let len = buf.len();
    let mut i = 0;

    while i + 8 <= len {
        // SAFETY: `i + 8 <= len` keeps the read in bounds.
        let chunk = unsafe { buf.as_ptr().add(i).cast::<u64>().read_unaligned() };

        let non_digit = (chunk.wrapping_sub(ZEROS) | chunk.wrapping_add(ABOVE_NINE)) & HI;
        if non_digit != 0 {
            return i + (non_digit.trailing_zeros() as usize / 8);
        }
        i += 8;
    }

    while i < len {
        if !buf[i].is_ascii_digit() {
            return i;
        }
        i += 1;
    }

    i
}

/// Scalar reference for [`swar_count_digits`], used by property tests.
#[cfg(test)]
fn scalar_count_digits(buf: &[u8]) -> usize {
    buf.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Zero-cost cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], enabling cheap snapshots.
///
/// # Invariant
///
/// `buf[source_len] == 0x00` and all bytes after it are `0x00`
/// (cache-line padding). Guaranteed by `SourceBuffer` construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

/// Size assertion: the cursor stays register-friendly.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!((source_len as usize) < buf.len());
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte at the current position; `0x00` at EOF (the sentinel).
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Byte one position ahead. Safe at any position thanks to padding.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// `true` when the current byte is the sentinel, not an interior null.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content and on UTF-8
    /// character boundaries, which holds for token boundaries produced by
    /// the scanner (the source was originally a valid `&str`).
    #[allow(unsafe_code)]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(end <= self.source_len, "slice end past source length");
        debug_assert!(start <= end, "slice start past end");
        // SAFETY: the buffer was constructed from `&str` and the scanner
        // keeps token boundaries on character boundaries.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Advance while `pred` holds for the current byte.
    ///
    /// # Contract
    ///
    /// `pred(0)` must return `false` so the sentinel terminates the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Advance past horizontal whitespace (spaces and tabs) using the
    /// SWAR fast path for long runs.
    #[inline]
    pub fn eat_whitespace(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        self.pos += swar_count_whitespace(remaining) as u32;
    }

    /// Advance past ASCII digits using the SWAR fast path.
    #[inline]
    pub fn eat_digits(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        self.pos += swar_count_digits(remaining) as u32;
    }

    /// Advance to the next `\n` byte or EOF using SIMD-accelerated search.
    ///
    /// Used to skip line comment bodies. If no newline is found the cursor
    /// lands on the EOF sentinel.
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(b'\n', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// Advance past ordinary string content to the next interesting byte
    /// and return it (0 for EOF).
    ///
    /// "Interesting" bytes for strings: `"`, `\`, `\n`.
    pub fn skip_to_string_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr3(b'"', b'\\', b'\n', remaining) {
            self.pos += offset as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance past block-comment content to the next `*` or `\n` and
    /// return it (0 for EOF).
    pub fn skip_to_comment_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr2(b'*', b'\n', remaining) {
            self.pos += offset as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    // === Basic navigation ===

    #[test]
    fn advance_through_source() {
        let buf = SourceBuffer::new("hi");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current(), b'h');
        cursor.advance();
        assert_eq!(cursor.current(), b'i');
        cursor.advance();
        assert!(cursor.is_eof());
    }

    #[test]
    fn peek_near_end_returns_sentinel() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.peek(), 0);
    }

    #[test]
    fn interior_null_is_not_eof() {
        let buf = SourceBuffer::new("a\0b");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof());
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
    }

    // === eat_whitespace ===

    #[test]
    fn eat_whitespace_mixed_runs() {
        let buf = SourceBuffer::new("  \t \t  x");
        let mut cursor = buf.cursor();
        cursor.eat_whitespace();
        assert_eq!(cursor.pos(), 7);
        assert_eq!(cursor.current(), b'x');
    }

    #[test]
    fn eat_whitespace_stops_at_newline() {
        let buf = SourceBuffer::new("   \nx");
        let mut cursor = buf.cursor();
        cursor.eat_whitespace();
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_whitespace_long_run_crosses_chunks() {
        let buf = SourceBuffer::new("                x"); // 16 spaces
        let mut cursor = buf.cursor();
        cursor.eat_whitespace();
        assert_eq!(cursor.pos(), 16);
    }

    // === eat_digits ===

    #[test]
    fn eat_digits_stops_at_non_digit() {
        let buf = SourceBuffer::new("12345abc");
        let mut cursor = buf.cursor();
        cursor.eat_digits();
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.current(), b'a');
    }

    #[test]
    fn eat_digits_long_run() {
        let buf = SourceBuffer::new("1234567890123456;");
        let mut cursor = buf.cursor();
        cursor.eat_digits();
        assert_eq!(cursor.pos(), 16);
    }

    // === Search helpers ===

    #[test]
    fn eat_until_newline_finds_lf() {
        let buf = SourceBuffer::new("// comment\nnext");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 10);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_stops_at_eof() {
        let buf = SourceBuffer::new("no newline");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert!(cursor.is_eof());
    }

    #[test]
    fn skip_to_string_delim_finds_earliest() {
        let buf = SourceBuffer::new("abc\\\"rest");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.skip_to_string_delim(), b'\\');
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn skip_to_string_delim_eof() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.skip_to_string_delim(), 0);
        assert!(cursor.is_eof());
    }

    #[test]
    fn skip_to_comment_delim_finds_star() {
        let buf = SourceBuffer::new("body */ after");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.skip_to_comment_delim(), b'*');
        assert_eq!(cursor.pos(), 5);
    }

    // === Copy semantics ===

    #[test]
    fn cursor_is_copy_for_checkpointing() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);
        let saved = cursor;
        cursor.advance_n(3);
        assert_eq!(cursor.pos(), 5);
        assert_eq!(saved.pos(), 2);
    }

    // === SWAR vs scalar agreement ===

    mod proptest_swar {
        use super::super::{
            scalar_count_digits, scalar_count_whitespace, swar_count_digits, swar_count_whitespace,
        };
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn whitespace_swar_matches_scalar(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert_eq!(scalar_count_whitespace(&bytes), swar_count_whitespace(&bytes));
            }

            #[test]
            fn whitespace_swar_matches_scalar_ws_heavy(
                bytes in proptest::collection::vec(
                    prop_oneof![Just(b' '), Just(b'\t'), Just(b'a'), Just(b'\n'), Just(b'\0')],
                    0..256,
                )
            ) {
                prop_assert_eq!(scalar_count_whitespace(&bytes), swar_count_whitespace(&bytes));
            }

            #[test]
            fn digits_swar_matches_scalar(
                bytes in proptest::collection::vec(
                    prop_oneof![Just(b'0'), Just(b'5'), Just(b'9'), Just(b'a'), Just(b'/'), Just(b':')],
                    0..256,
                )
            ) {
                prop_assert_eq!(scalar_count_digits(&bytes), swar_count_digits(&bytes));
            }
        }
    }
}
