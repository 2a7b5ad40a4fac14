//! Shared helpers for lexer tests.

use crate::DocSourceSpan;
use crate::SourcePosition;
use crate::token::DocToken;
use crate::token::DocTokenKind;
use crate::token_source::StrDocTokenSource;

/// Creates a token of the given kind whose span covers
/// `[offset, offset + text.len())` on line 0.
pub fn mock_token(
    kind: DocTokenKind,
    text: &str,
    offset: usize,
) -> DocToken<'static> {
    let start = SourcePosition::new(0, offset, offset);
    let end = SourcePosition::new(0, offset + text.len(), offset + text.len());
    DocToken::new(kind, text.to_string(), DocSourceSpan::new(start, end))
}

/// A token source that replays a fixed list of tokens.
pub struct MockTokenSource {
    tokens: std::vec::IntoIter<DocToken<'static>>,
}

impl MockTokenSource {
    pub fn new(tokens: Vec<DocToken<'static>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl Iterator for MockTokenSource {
    type Item = DocToken<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }
}

/// Lexes `source` and returns `(kind, text)` for every token.
pub fn lex(source: &str) -> Vec<(DocTokenKind, String)> {
    StrDocTokenSource::new(source)
        .map(|token| (token.kind, token.text.into_owned()))
        .collect()
}
