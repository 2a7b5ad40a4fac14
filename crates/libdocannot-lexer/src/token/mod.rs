//! Token types produced by docblock lexers and consumed by the annotation
//! parser.

mod doc_token;
mod doc_token_kind;

pub use doc_token::DocToken;
pub use doc_token_kind::DocTokenKind;
