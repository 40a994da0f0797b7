//! Byte lexer for Yu source.
//!
//! Turns a byte buffer into a columnar [`TokenList`] terminated by an
//! `END_OF_FILE` token, tracking line start offsets for O(log n)
//! line/column lookup. The lexer never fails on malformed input: every
//! lexical error becomes a flag bit on the offending token.
//!
//! # Design
//!
//! Scanning runs over a sentinel-terminated [`SourceBuffer`]; dispatch is
//! a 256-entry character-class table plus a 256-entry single-character
//! token table. Whitespace and digit runs use SWAR fast paths; comment
//! and string bodies use `memchr`-accelerated skips.
//!
//! # Ownership
//!
//! The lexer owns the source buffer, the token list, and the line start
//! table. Token values are borrowed views into the buffer and stay valid
//! for as long as the lexer lives.

mod cursor;
mod keywords;
mod source;
mod tables;

pub use cursor::Cursor;
pub use source::SourceBuffer;

use tables::{
    BIN_DIGIT, CHAR_CLASS, CLASS_DIGIT, CLASS_IDENT_START, CLASS_QUOTE, HEX_DIGIT,
    SINGLE_CHAR_TOKENS, VALID_ESCAPES,
};
use yu_ir::{Token, TokenFlags, TokenKind, TokenList};

/// Lexer for one compilation unit.
pub struct Lexer {
    buffer: SourceBuffer,
    tokens: TokenList,
    /// Byte offset of the first character of each line; entry 0 is 0.
    line_starts: Vec<u32>,
}

impl Lexer {
    /// Create a lexer over `source`.
    pub fn new(source: &str) -> Self {
        let buffer = SourceBuffer::new(source);
        let mut tokens = TokenList::new();
        tokens.reserve(source.len() / 4 + 1);
        let mut line_starts = Vec::with_capacity(source.len() / 40 + 1);
        line_starts.push(0);
        Lexer {
            buffer,
            tokens,
            line_starts,
        }
    }

    /// Tokenize the entire source.
    ///
    /// Terminates for any input and always produces a non-empty list whose
    /// last token is [`TokenKind::Eof`]. Calling it again returns the
    /// already-built list.
    pub fn tokenize(&mut self) -> &TokenList {
        if !self.tokens.is_empty() {
            return &self.tokens;
        }

        let mut scanner = Scanner {
            cursor: self.buffer.cursor(),
            line_starts: &mut self.line_starts,
            pending_flags: TokenFlags::NONE,
        };
        loop {
            let token = scanner.next_token();
            let done = token.kind == TokenKind::Eof;
            self.tokens.push(token);
            if done {
                break;
            }
        }
        &self.tokens
    }

    /// The token list built by [`tokenize`](Self::tokenize).
    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Full source text.
    pub fn source(&self) -> &str {
        self.buffer.slice(0, self.buffer.len())
    }

    /// Line start offsets (entry 0 is 0, one entry appended per newline).
    pub fn line_starts(&self) -> &[u32] {
        &self.line_starts
    }

    /// 1-based line and column of a token via upper-bound search over the
    /// line start table.
    pub fn get_line_col(&self, token: Token) -> (u32, u32) {
        self.line_col_at(token.start)
    }

    /// 1-based line and column of a byte offset.
    pub fn line_col_at(&self, offset: u32) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&s| s <= offset) as u32;
        let col = offset - self.line_starts[line as usize - 1] + 1;
        (line, col)
    }

    /// Source slice covered by a token.
    pub fn get_token_value(&self, token: Token) -> &str {
        self.buffer
            .slice(token.start, token.start + token.length as u32)
    }

    /// Source slice covered by the token at `index`.
    pub fn value_at(&self, index: usize) -> &str {
        self.get_token_value(self.tokens.get(index))
    }

    /// Text of a 1-based source line, without its trailing newline.
    pub fn source_line(&self, line: u32) -> &str {
        let Some(&start) = self.line_starts.get(line as usize - 1) else {
            return "";
        };
        let bytes = self.buffer.as_bytes();
        let end = memchr::memchr(b'\n', &bytes[start as usize..])
            .map(|off| start + off as u32)
            .unwrap_or(self.buffer.len());
        // Strip a trailing \r from CRLF sources.
        let end = if end > start && bytes[end as usize - 1] == b'\r' {
            end - 1
        } else {
            end
        };
        self.buffer.slice(start, end)
    }
}

/// Internal scanning state: a cursor plus the line start table.
struct Scanner<'a> {
    cursor: Cursor<'a>,
    line_starts: &'a mut Vec<u32>,
    /// Flags to attach to the EOF token (unterminated block comment).
    pending_flags: TokenFlags,
}

impl Scanner<'_> {
    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            let flags = std::mem::take(&mut self.pending_flags);
            return Token::new(start, 0, TokenKind::Eof, flags);
        }

        let byte = self.cursor.current();
        match CHAR_CLASS[byte as usize] {
            CLASS_IDENT_START => self.lex_identifier(start),
            CLASS_DIGIT => self.lex_number(start),
            CLASS_QUOTE => self.lex_string(start),
            _ => {
                self.cursor.advance();
                Token::new(
                    start,
                    1,
                    SINGLE_CHAR_TOKENS[byte as usize],
                    TokenFlags::NONE,
                )
            }
        }
    }

    /// Skip whitespace and comments, tracking line starts.
    ///
    /// Single-line comments consume through the end of line; block
    /// comments accumulate newlines into the line start table and flag the
    /// EOF token when left unclosed.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.eat_whitespace();
            match self.cursor.current() {
                b'\n' => {
                    self.cursor.advance();
                    self.line_starts.push(self.cursor.pos());
                }
                b'\r' => self.cursor.advance(),
                b'/' => match self.cursor.peek() {
                    b'/' => {
                        self.cursor.advance_n(2);
                        self.cursor.eat_until_newline_or_eof();
                    }
                    b'*' => {
                        self.cursor.advance_n(2);
                        self.skip_block_comment();
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        loop {
            match self.cursor.skip_to_comment_delim() {
                0 => {
                    self.pending_flags
                        .set(TokenFlags::UNTERMINATED_BLOCK_COMMENT);
                    return;
                }
                b'\n' => {
                    self.cursor.advance();
                    self.line_starts.push(self.cursor.pos());
                }
                _ => {
                    // '*': closes the comment only when followed by '/'.
                    self.cursor.advance();
                    if self.cursor.current() == b'/' {
                        self.cursor.advance();
                        return;
                    }
                }
            }
        }
    }

    fn lex_identifier(&mut self, start: u32) -> Token {
        let mut flags = TokenFlags::NONE;
        let first = self.cursor.current();
        flags.set_if(
            !(first.is_ascii_alphabetic() || first == b'_' || first == b'@'),
            TokenFlags::INVALID_IDENTIFIER_START,
        );
        if first == b'@' {
            self.cursor.advance();
        }

        loop {
            let b = self.cursor.current();
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.cursor.advance();
            } else if b == 0 && self.cursor.is_eof() {
                break;
            } else if b.is_ascii_whitespace() || b.is_ascii_punctuation() {
                break;
            } else {
                // Invalid byte inside an identifier: flag it but keep
                // consuming so the scanner resynchronizes on the next
                // whitespace or punctuation.
                flags.set(TokenFlags::INVALID_IDENTIFIER_CHAR);
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice(start, self.cursor.pos());
        self.finish(start, keywords::resolve(text), flags)
    }

    fn lex_number(&mut self, start: u32) -> Token {
        let mut flags = TokenFlags::NONE;

        let is_radix_prefix = self.cursor.current() == b'0'
            && matches!(self.cursor.peek() | 0x20, b'x' | b'b');
        if is_radix_prefix {
            let lookup: &[bool; 256] = if (self.cursor.peek() | 0x20) == b'x' {
                &HEX_DIGIT
            } else {
                &BIN_DIGIT
            };
            self.cursor.advance_n(2);

            let mut any_valid = false;
            loop {
                let b = self.cursor.current();
                if lookup[b as usize] {
                    any_valid = true;
                    self.cursor.advance();
                } else if b.is_ascii_alphanumeric() {
                    flags.set(TokenFlags::INVALID_DIGIT);
                    self.cursor.advance();
                } else {
                    break;
                }
            }
            flags.set_if(!any_valid, TokenFlags::INVALID_DIGIT);
            return self.finish(start, TokenKind::NumLiteral, flags);
        }

        // Decimal: digit runs interleaved with at most one '.'.
        let mut decimal_points = 0u32;
        loop {
            self.cursor.eat_digits();
            if self.cursor.current() == b'.' {
                decimal_points += 1;
                flags.set_if(decimal_points > 1, TokenFlags::MULTIPLE_DECIMAL_POINTS);
                self.cursor.advance();
            } else {
                break;
            }
        }

        // Optional exponent: e[+-]?digits
        if (self.cursor.current() | 0x20) == b'e' {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            if self.cursor.current().is_ascii_digit() {
                self.cursor.eat_digits();
            } else {
                flags.set(TokenFlags::INVALID_EXPONENT);
            }
        }

        self.finish(start, TokenKind::NumLiteral, flags)
    }

    fn lex_string(&mut self, start: u32) -> Token {
        let mut flags = TokenFlags::NONE;
        let mut terminated = false;
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.skip_to_string_delim() {
                0 => break, // EOF
                b'"' => {
                    self.cursor.advance();
                    terminated = true;
                    break;
                }
                b'\n' => {
                    // Strings may span lines; the line table must still
                    // advance.
                    self.cursor.advance();
                    self.line_starts.push(self.cursor.pos());
                }
                _ => {
                    // Backslash escape.
                    let esc = self.cursor.peek();
                    if esc == 0 && self.cursor.pos() + 1 >= self.cursor.source_len() {
                        // Lone backslash at EOF.
                        self.cursor.advance();
                    } else if VALID_ESCAPES[esc as usize] {
                        self.cursor.advance_n(2);
                        if esc == b'x' {
                            // \x consumes two hex digits.
                            let mut hex_digits = 0;
                            while hex_digits < 2 && HEX_DIGIT[self.cursor.current() as usize] {
                                self.cursor.advance();
                                hex_digits += 1;
                            }
                            flags.set_if(hex_digits != 2, TokenFlags::INVALID_ESCAPE_SEQUENCE);
                        }
                    } else {
                        // Unknown escape: flag it, consume the backslash,
                        // and keep scanning for the closing quote.
                        flags.set(TokenFlags::INVALID_ESCAPE_SEQUENCE);
                        self.cursor.advance();
                    }
                }
            }
        }

        flags.set_if(!terminated, TokenFlags::UNTERMINATED_STRING);
        self.finish(start, TokenKind::StrLiteral, flags)
    }

    fn finish(&self, start: u32, kind: TokenKind, flags: TokenFlags) -> Token {
        let length = (self.cursor.pos() - start).min(u16::MAX as u32) as u16;
        Token::new(start, length, kind, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize().kinds().to_vec()
    }

    fn single(source: &str) -> (Token, Lexer) {
        let mut lexer = Lexer::new(source);
        lexer.tokenize();
        let token = lexer.tokens().get(0);
        (token, lexer)
    }

    // === Dispatch ===

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![Eof]);
        assert_eq!(kinds("   \t  "), vec![Eof]);
    }

    #[test]
    fn keywords_types_and_identifiers() {
        assert_eq!(
            kinds("var x: i32 = y;"),
            vec![Var, Identifier, Colon, I32, Equal, Identifier, Semicolon, Eof]
        );
    }

    #[test]
    fn nested_generics_emit_individual_greater_tokens() {
        // Three GREATER tokens, never a merged shift.
        assert_eq!(
            kinds("var matrix: Array<Array<Vector3<T>>>;"),
            vec![
                Var, Identifier, Colon, Identifier, Less, Identifier, Less, Identifier, Less,
                Identifier, Greater, Greater, Greater, Semicolon, Eof
            ]
        );
    }

    #[test]
    fn annotations_resolve_to_kinds() {
        assert_eq!(kinds("@pure @custom"), vec![PureAnnot, Annotation, Eof]);
    }

    #[test]
    fn unknown_bytes_make_unknown_tokens() {
        assert_eq!(kinds("#"), vec![Unknown, Eof]);
    }

    // === Numbers ===

    #[test]
    fn number_literals_lex_clean() {
        for src in ["0xFF", "0b1010", "1.23e-4", "42", "0x1A2b", "3.5", "1e9", "2E+4"] {
            let (token, lexer) = single(src);
            assert_eq!(token.kind, NumLiteral, "{src}");
            assert!(token.flags.is_empty(), "{src}: {:?}", token.flags);
            assert_eq!(lexer.get_token_value(token), src);
        }
    }

    #[test]
    fn multiple_decimal_points_flagged() {
        let (token, _) = single("1.2.3");
        assert!(token.flags.contains(TokenFlags::MULTIPLE_DECIMAL_POINTS));
        assert_eq!(token.length, 5);
    }

    #[test]
    fn invalid_exponent_flagged() {
        for src in ["1e", "1e+", "2e-;"] {
            let (token, _) = single(src);
            assert!(
                token.flags.contains(TokenFlags::INVALID_EXPONENT),
                "{src}"
            );
        }
    }

    #[test]
    fn radix_prefix_without_digits_flagged() {
        for src in ["0x", "0b", "0xZZ"] {
            let (token, _) = single(src);
            assert!(token.flags.contains(TokenFlags::INVALID_DIGIT), "{src}");
        }
    }

    #[test]
    fn invalid_radix_digit_flagged_and_consumed() {
        let (token, lexer) = single("0b1012;");
        assert!(token.flags.contains(TokenFlags::INVALID_DIGIT));
        assert_eq!(lexer.get_token_value(token), "0b1012");
    }

    // === Strings ===

    #[test]
    fn simple_string() {
        let (token, lexer) = single(r#""hello""#);
        assert_eq!(token.kind, StrLiteral);
        assert!(token.flags.is_empty());
        assert_eq!(lexer.get_token_value(token), r#""hello""#);
    }

    #[test]
    fn valid_escapes_lex_clean() {
        let (token, _) = single(r#""a\nb\tc\\d\"e\0f\x41g""#);
        assert!(token.flags.is_empty(), "{:?}", token.flags);
    }

    #[test]
    fn invalid_escape_flagged_but_string_closes() {
        let (token, lexer) = single(r#""abc\q";"#);
        assert!(token.flags.contains(TokenFlags::INVALID_ESCAPE_SEQUENCE));
        assert!(!token.flags.contains(TokenFlags::UNTERMINATED_STRING));
        assert_eq!(lexer.get_token_value(token), r#""abc\q""#);
        assert_eq!(lexer.tokens().kinds()[1], Semicolon);
    }

    #[test]
    fn unterminated_string_flagged() {
        let (token, _) = single(r#""abc"#);
        assert_eq!(token.kind, StrLiteral);
        assert!(token.flags.contains(TokenFlags::UNTERMINATED_STRING));
    }

    #[test]
    fn short_hex_escape_flagged() {
        let (token, _) = single(r#""\x4""#);
        assert!(token.flags.contains(TokenFlags::INVALID_ESCAPE_SEQUENCE));
    }

    // === Identifiers ===

    #[test]
    fn invalid_identifier_byte_flagged_and_resynced() {
        let mut lexer = Lexer::new("ab\u{00e9}cd efg");
        lexer.tokenize();
        let first = lexer.tokens().get(0);
        assert_eq!(first.kind, Identifier);
        assert!(first.flags.contains(TokenFlags::INVALID_IDENTIFIER_CHAR));
        // Resynchronized at the whitespace; the next token is clean.
        let second = lexer.tokens().get(1);
        assert_eq!(second.kind, Identifier);
        assert!(second.flags.is_empty());
        assert_eq!(lexer.get_token_value(second), "efg");
    }

    // === Comments ===

    #[test]
    fn comments_are_invisible_to_the_token_stream() {
        let plain = kinds("var x = 1;");
        let commented = kinds("var /* inline */ x = // trailing\n 1;");
        assert_eq!(plain, commented);
    }

    #[test]
    fn block_comment_newlines_update_line_table() {
        let mut lexer = Lexer::new("/* a\n b\n */ var");
        lexer.tokenize();
        let var = lexer.tokens().get(0);
        assert_eq!(lexer.get_line_col(var), (3, 5));
    }

    #[test]
    fn unterminated_block_comment_flags_eof() {
        let mut lexer = Lexer::new("var /* never closed");
        lexer.tokenize();
        let eof = lexer.tokens().get(lexer.tokens().len() - 1);
        assert_eq!(eof.kind, Eof);
        assert!(eof.flags.contains(TokenFlags::UNTERMINATED_BLOCK_COMMENT));
    }

    // === Line/column ===

    #[test]
    fn line_col_lookup() {
        let mut lexer = Lexer::new("var x = 1;\nvar y = 2;");
        lexer.tokenize();
        let tokens = lexer.tokens();
        // First `var` at 1:1, second at 2:1, `y` at 2:5.
        assert_eq!(lexer.get_line_col(tokens.get(0)), (1, 1));
        assert_eq!(lexer.get_line_col(tokens.get(5)), (2, 1));
        assert_eq!(lexer.get_line_col(tokens.get(6)), (2, 5));
    }

    #[test]
    fn line_col_is_monotonic() {
        let mut lexer = Lexer::new("var a = 1;\n\nvar b = \"two\";\nvar c = a & b;\n");
        lexer.tokenize();
        let mut prev = (0, 0);
        for token in lexer.tokens().iter() {
            let pos = lexer.get_line_col(token);
            assert!(pos >= prev, "line/col went backwards: {prev:?} -> {pos:?}");
            prev = pos;
        }
    }

    #[test]
    fn source_line_excerpts() {
        let lexer = {
            let mut l = Lexer::new("first line\nsecond line\r\nthird");
            l.tokenize();
            l
        };
        assert_eq!(lexer.source_line(1), "first line");
        assert_eq!(lexer.source_line(2), "second line");
        assert_eq!(lexer.source_line(3), "third");
    }

    // === Round-trip ===

    #[test]
    fn token_values_round_trip_source_slices() {
        let source = "function add(a: i32, b: i32) -> i32 { return a + b; }";
        let mut lexer = Lexer::new(source);
        lexer.tokenize();
        for token in lexer.tokens().iter() {
            let value = lexer.get_token_value(token);
            assert_eq!(
                value,
                &source[token.start as usize..token.start as usize + token.length as usize]
            );
        }
    }

    // === Totality ===

    mod proptest_totality {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tokenize_terminates_and_ends_in_eof(source in "\\PC{0,120}") {
                let mut lexer = Lexer::new(&source);
                let tokens = lexer.tokenize();
                prop_assert!(!tokens.is_empty());
                prop_assert_eq!(tokens.kinds()[tokens.len() - 1], TokenKind::Eof);
            }

            #[test]
            fn tokenize_handles_arbitrary_unicode(source in proptest::string::string_regex(".{0,80}").unwrap()) {
                let mut lexer = Lexer::new(&source);
                let tokens = lexer.tokenize();
                prop_assert_eq!(tokens.kinds()[tokens.len() - 1], TokenKind::Eof);
            }
        }
    }
}
