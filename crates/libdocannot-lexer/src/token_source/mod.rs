//! Token source trait and the `&str` lexer.

mod doc_token_source;
mod str_doc_token_source;

pub use doc_token_source::DocTokenSource;
pub use str_doc_token_source::StrDocTokenSource;
