pub use libdocannot_core::*;

/// The docblock tokenizer and token stream the annotation parser is built
/// on, for tools that want tokens without annotation semantics.
pub mod lexer {
    pub use libdocannot_lexer::*;
}
