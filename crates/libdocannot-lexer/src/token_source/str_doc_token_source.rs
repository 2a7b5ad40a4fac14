//! A [`DocTokenSource`] that lexes from a `&str` input.
//!
//! Token text borrows directly from the source string. Characters that do
//! not start a token (whitespace, `*`, `/`, punctuation outside the
//! grammar, free-form prose) are consumed without producing tokens. A run of
//! such characters other than whitespace and `*` that ends right where a
//! token begins is recorded as that token's
//! [`preceding_prose`](DocToken::preceding_prose).
//!
//! # Usage
//!
//! ```rust
//! use libdocannot_lexer::token::DocTokenKind;
//! use libdocannot_lexer::token_source::StrDocTokenSource;
//!
//! let kinds: Vec<DocTokenKind> = StrDocTokenSource::new("@Route(\"/\")")
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds, vec![
//!     DocTokenKind::At,
//!     DocTokenKind::Identifier,
//!     DocTokenKind::OpenParen,
//!     DocTokenKind::String,
//!     DocTokenKind::CloseParen,
//! ]);
//! ```

use crate::DocSourceSpan;
use crate::SourcePosition;
use crate::token::DocToken;
use crate::token::DocTokenKind;

/// A [`DocTokenSource`](crate::token_source::DocTokenSource) over a `&str`.
///
/// See module documentation for details.
pub struct StrDocTokenSource<'src> {
    /// The full text. Spans are always reported relative to this, even when
    /// only a sub-range is being lexed.
    source: &'src str,

    /// Current byte offset from the start of `source`.
    curr_byte_offset: usize,

    /// Byte offset at which lexing stops.
    end_byte_offset: usize,

    curr_line: usize,
    curr_col: usize,
    last_char_was_cr: bool,
}

impl<'src> StrDocTokenSource<'src> {
    /// Creates a token source over all of `source`.
    pub fn new(source: &'src str) -> Self {
        Self::with_range(source, 0, source.len())
    }

    /// Creates a token source that lexes only `source[start..end]`.
    ///
    /// Positions in the produced spans are still measured from the start of
    /// `source`. Both bounds are clamped to the text and must fall on `char`
    /// boundaries; a bound that does not is moved back to the previous one.
    pub fn with_range(source: &'src str, start: usize, end: usize) -> Self {
        let end = floor_char_boundary(source, end.min(source.len()));
        let start = floor_char_boundary(source, start.min(end));
        let start_pos = SourcePosition::locate(source, start);
        Self {
            source,
            curr_byte_offset: start,
            end_byte_offset: end,
            curr_line: start_pos.line(),
            curr_col: start_pos.col(),
            last_char_was_cr: start > 0
                && source.as_bytes().get(start - 1) == Some(&b'\r'),
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..self.end_byte_offset]
    }

    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(
            self.curr_line,
            self.curr_col,
            self.curr_byte_offset,
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.peek_char_nth(0)
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes the next character and updates position tracking.
    ///
    /// `\n`, `\r` and `\r\n` each count as a single line break.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        match ch {
            '\n' if self.last_char_was_cr => self.last_char_was_cr = false,
            '\n' => {
                self.curr_line += 1;
                self.curr_col = 0;
            },
            '\r' => {
                self.curr_line += 1;
                self.curr_col = 0;
                self.last_char_was_cr = true;
            },
            _ => {
                self.curr_col += 1;
                self.last_char_was_cr = false;
            },
        }
        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.consume();
        }
    }

    /// Builds a token whose text runs from `start` to the current position.
    fn make_token(
        &self,
        kind: DocTokenKind,
        start: SourcePosition,
    ) -> DocToken<'src> {
        let end = self.curr_position();
        DocToken::new(
            kind,
            &self.source[start.byte_offset()..end.byte_offset()],
            DocSourceSpan::new(start, end),
        )
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    fn next_token(&mut self) -> Option<DocToken<'src>> {
        let mut prose_start: Option<SourcePosition> = None;
        loop {
            let start = self.curr_position();
            let ch = self.peek_char()?;

            if let Some(mut token) = self.lex_token(ch, start) {
                token.preceding_prose =
                    prose_start.map(|prose| DocSourceSpan::new(prose, start));
                return Some(token);
            }

            self.consume();
            if ch.is_whitespace() || ch == '*' {
                prose_start = None;
            } else if prose_start.is_none() {
                prose_start = Some(start);
            }
        }
    }

    /// Lexes the token starting with `ch`, or returns `None` (consuming
    /// nothing) if `ch` is prose.
    fn lex_token(
        &mut self,
        ch: char,
        start: SourcePosition,
    ) -> Option<DocToken<'src>> {
        let punctuator = match ch {
            '@' => Some(DocTokenKind::At),
            '\\' => Some(DocTokenKind::NamespaceSeparator),
            '(' => Some(DocTokenKind::OpenParen),
            ')' => Some(DocTokenKind::CloseParen),
            '{' => Some(DocTokenKind::OpenBrace),
            '}' => Some(DocTokenKind::CloseBrace),
            ',' => Some(DocTokenKind::Comma),
            '=' => Some(DocTokenKind::Equals),
            ':' => Some(DocTokenKind::Colon),
            _ => None,
        };
        if let Some(kind) = punctuator {
            self.consume();
            return Some(self.make_token(kind, start));
        }

        // An unterminated quote is ordinary prose.
        if ch == '"' {
            return self.lex_string(start);
        }

        if ch.is_ascii_digit()
            || (matches!(ch, '+' | '-')
                && self.peek_char_nth(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return Some(self.lex_number(start));
        }

        if is_identifier_start(ch) {
            return Some(self.lex_identifier(start));
        }

        None
    }

    // =========================================================================
    // Identifiers and literal keywords
    // =========================================================================

    fn lex_identifier(&mut self, start: SourcePosition) -> DocToken<'src> {
        self.consume_while(is_identifier_continue);
        let text = &self.source[start.byte_offset()..self.curr_byte_offset];
        let kind = if text.eq_ignore_ascii_case("true") {
            DocTokenKind::True
        } else if text.eq_ignore_ascii_case("false") {
            DocTokenKind::False
        } else if text.eq_ignore_ascii_case("null") {
            DocTokenKind::Null
        } else {
            DocTokenKind::Identifier
        };
        self.make_token(kind, start)
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Lexes `[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
    ///
    /// A `.` or exponent marker that is not followed by digits is left for
    /// the next token.
    fn lex_number(&mut self, start: SourcePosition) -> DocToken<'src> {
        let mut is_float = false;

        if matches!(self.peek_char(), Some('+' | '-')) {
            self.consume();
        }
        self.consume_while(|c| c.is_ascii_digit());

        if self.peek_char() == Some('.')
            && self.peek_char_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.consume();
            self.consume_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            let exponent_digit_at = match self.peek_char_nth(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self
                .peek_char_nth(exponent_digit_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                for _ in 0..exponent_digit_at {
                    self.consume();
                }
                self.consume_while(|c| c.is_ascii_digit());
            }
        }

        let kind = if is_float {
            DocTokenKind::Float
        } else {
            DocTokenKind::Integer
        };
        self.make_token(kind, start)
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Lexes a double-quoted string where `""` escapes a quote.
    ///
    /// Returns `None` (consuming nothing) if the closing quote is missing.
    fn lex_string(&mut self, start: SourcePosition) -> Option<DocToken<'src>> {
        let body = self.remaining().get(1..)?;
        let mut chars = body.char_indices().peekable();
        let mut close_at = None;
        while let Some((idx, ch)) = chars.next() {
            if ch != '"' {
                continue;
            }
            if chars.peek().is_some_and(|&(_, next)| next == '"') {
                chars.next();
                continue;
            }
            close_at = Some(idx);
            break;
        }
        // +2 covers both quotes.
        let string_len = close_at? + 2;
        let target = self.curr_byte_offset + string_len;
        while self.curr_byte_offset < target {
            self.consume();
        }
        Some(self.make_token(DocTokenKind::String, start))
    }
}

// =============================================================================
// Iterator implementation
// =============================================================================

impl<'src> Iterator for StrDocTokenSource<'src> {
    type Item = DocToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

// =============================================================================
// Helper functions
// =============================================================================

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch == ':' || ch.is_ascii_alphanumeric()
}

fn floor_char_boundary(source: &str, mut idx: usize) -> usize {
    while idx > 0 && !source.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
