use crate::token::DocToken;

/// Marker trait for [`DocToken`] lexers (iterators that generate
/// [`DocToken`]s).
///
/// All lookahead and buffering is handled by
/// [`DocTokenStream`](crate::DocTokenStream); a token source only has to
/// produce tokens in order and stop at the end of its input. Unlike a
/// general-purpose lexer there is no end-of-input token and no error token:
/// text that is not part of the annotation grammar is simply skipped.
pub trait DocTokenSource<'src>: Iterator<Item = DocToken<'src>> {}

impl<'src, T> DocTokenSource<'src> for T
where
    T: Iterator<Item = DocToken<'src>>,
{}
