//! Lexing layer for docblock annotation text.
//!
//! The lexer recognizes only the handful of tokens the annotation grammar
//! cares about. Everything else in a comment (whitespace, leading `*`,
//! free-form prose) is skipped without producing a token.

mod doc_source_span;
mod doc_token_stream;
mod source_position;
pub mod token;
pub mod token_source;

pub use doc_source_span::DocSourceSpan;
pub use doc_token_stream::DocTokenStream;
pub use source_position::SourcePosition;

#[cfg(test)]
mod tests;
