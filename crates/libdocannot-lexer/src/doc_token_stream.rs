//! Buffered view over a [`DocTokenSource`] offering the *current* token,
//! the *lookahead* token and a *glimpse* one token past the lookahead.

use std::collections::VecDeque;

use crate::token::DocToken;
use crate::token::DocTokenKind;
use crate::token_source::DocTokenSource;

/// Buffered token stream driving the annotation parser.
///
/// The stream keeps the most recently consumed token as [`current`] so that
/// the parser can check whether the next token is directly adjacent to it.
/// [`lookahead`] and [`glimpse`] never advance the stream.
///
/// A stream is bound to one input. Parsing new text means building a new
/// stream over a new token source.
///
/// [`current`]: DocTokenStream::current
/// [`lookahead`]: DocTokenStream::lookahead
/// [`glimpse`]: DocTokenStream::glimpse
pub struct DocTokenStream<
    'src,
    TTokenSource: DocTokenSource<'src>,
> {
    token_source: TTokenSource,
    /// Unconsumed tokens; the front is the lookahead.
    buffer: VecDeque<DocToken<'src>>,
    current: Option<DocToken<'src>>,
}

impl<'src, TTokenSource: DocTokenSource<'src>>
    DocTokenStream<'src, TTokenSource>
{
    pub fn new(token_source: TTokenSource) -> Self {
        Self {
            token_source,
            buffer: VecDeque::new(),
            current: None,
        }
    }

    /// Consumes the lookahead token, making it the current token.
    ///
    /// Returns the consumed token, or `None` if the stream is exhausted (in
    /// which case the current token is left unchanged).
    pub fn advance(&mut self) -> Option<DocToken<'src>> {
        self.ensure_buffer_has(1);
        let token = self.buffer.pop_front()?;
        self.current = Some(token.clone());
        Some(token)
    }

    /// The most recently consumed token, if any.
    pub fn current(&self) -> Option<&DocToken<'src>> {
        self.current.as_ref()
    }

    fn ensure_buffer_has(&mut self, count: usize) {
        while self.buffer.len() < count {
            match self.token_source.next() {
                Some(token) => self.buffer.push_back(token),
                None => break,
            }
        }
    }

    /// Peeks one token past the lookahead without consuming anything.
    #[inline]
    pub fn glimpse(&mut self) -> Option<&DocToken<'src>> {
        self.peek_nth(1)
    }

    /// Returns `true` once no lookahead token remains.
    pub fn is_at_end(&mut self) -> bool {
        self.lookahead().is_none()
    }

    /// Returns `true` if the lookahead token has the given kind.
    pub fn is_next(&mut self, kind: DocTokenKind) -> bool {
        self.lookahead().is_some_and(|token| token.kind == kind)
    }

    /// Returns `true` if the lookahead token has any of the given kinds.
    pub fn is_next_any(&mut self, kinds: &[DocTokenKind]) -> bool {
        self.lookahead()
            .is_some_and(|token| kinds.contains(&token.kind))
    }

    /// The next unconsumed token.
    #[inline]
    pub fn lookahead(&mut self) -> Option<&DocToken<'src>> {
        self.peek_nth(0)
    }

    /// Peeks at the nth unconsumed token (0 is the lookahead).
    pub fn peek_nth(&mut self, n: usize) -> Option<&DocToken<'src>> {
        self.ensure_buffer_has(n + 1);
        self.buffer.get(n)
    }
}
