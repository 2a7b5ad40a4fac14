use crate::DocSourceSpan;
use crate::token::DocTokenKind;
use std::borrow::Cow;
use std::num::ParseFloatError;

/// A docblock token: its kind, the exact source text it was lexed from and
/// where that text sits in the input.
#[derive(Clone, Debug, PartialEq)]
pub struct DocToken<'src> {
    pub kind: DocTokenKind,

    /// Raw source text of the token. For strings this still includes the
    /// surrounding quotes and any `""` escapes.
    pub text: Cow<'src, str>,

    pub span: DocSourceSpan,

    /// The run of skipped prose characters (anything other than
    /// whitespace and `*`) that ends exactly where this token starts, if
    /// any. Prose never becomes a token of its own, so this is the only way
    /// to tell that `` `@Foo` `` glues its `@` to the backtick.
    pub preceding_prose: Option<DocSourceSpan>,
}

impl<'src> DocToken<'src> {
    pub fn new(
        kind: DocTokenKind,
        text: impl Into<Cow<'src, str>>,
        span: DocSourceSpan,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            preceding_prose: None,
        }
    }

    /// Parse an `Integer` token's text to `i64`.
    ///
    /// Literals outside the `i64` range saturate at `i64::MIN`/`i64::MAX`.
    /// Returns `None` if this is not an `Integer` token.
    pub fn parse_int_value(&self) -> Option<i64> {
        if self.kind != DocTokenKind::Integer {
            return None;
        }
        Some(self.text.parse::<i64>().unwrap_or_else(|_| {
            if self.text.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }))
    }

    /// Parse a `Float` token's text to `f64`.
    ///
    /// Returns `None` if this is not a `Float` token.
    pub fn parse_float_value(&self) -> Option<Result<f64, ParseFloatError>> {
        match self.kind {
            DocTokenKind::Float => Some(self.text.parse()),
            _ => None,
        }
    }

    /// Strips the quotes from a `String` token and collapses each `""`
    /// escape to a single `"`.
    ///
    /// Borrows from the source when the string holds no escapes. Returns
    /// `None` if this is not a `String` token.
    pub fn parse_string_value(&self) -> Option<Cow<'src, str>> {
        if self.kind != DocTokenKind::String {
            return None;
        }
        let inner = match &self.text {
            Cow::Borrowed(raw) => strip_quotes(*raw).map(Cow::Borrowed),
            Cow::Owned(raw) => {
                strip_quotes(raw).map(|s| Cow::Owned(s.to_string()))
            },
        }?;
        if inner.contains("\"\"") {
            Some(Cow::Owned(inner.replace("\"\"", "\"")))
        } else {
            Some(inner)
        }
    }
}

fn strip_quotes(raw: &str) -> Option<&str> {
    raw.strip_prefix('"')?.strip_suffix('"')
}
