/// Whether an error came from the grammar or from the meaning of
/// well-formed input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocParseErrorCategory {
    Syntax,
    Semantic,
}

/// Categorizes parse errors for programmatic handling.
///
/// The `#[error(...)]` texts are short. The full human-readable message
/// lives on [`DocParseError`](crate::DocParseError).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DocParseErrorKind {
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: String,
        found: String,
        /// Byte offset of the offending token.
        position: usize,
    },

    #[error("unexpected end of input")]
    UnexpectedEndOfInput { expected: String },

    /// Annotations or arrays nested deeper than the parser allows.
    #[error("nesting too deep")]
    RecursionLimitExceeded,

    #[error("annotation `@{name}` was never imported")]
    NotImported { name: String },

    #[error("annotation type `{name}` does not exist")]
    TypeNotFound { name: String },

    #[error("`{name}` is not an annotation type")]
    NotAnAnnotation { name: String },

    #[error("annotation `@{name}` is not allowed on {target}")]
    TargetNotAllowed {
        name: String,
        target: String,
        allowed: String,
    },

    #[error("annotation `@{name}` has no field `{field}`")]
    UnknownField {
        name: String,
        field: String,
        available: Vec<String>,
    },

    #[error("annotation `@{name}` accepts no values")]
    NoValuesAccepted { name: String },

    #[error("field `{field}` of `@{name}` expects {expected}")]
    TypeMismatch {
        name: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("annotation `@{name}` could not be created")]
    CreationFailed { name: String, reason: String },

    #[error("invalid `@{name}`")]
    InvalidMetaAnnotation { name: String, reason: String },
}

impl DocParseErrorKind {
    pub fn category(&self) -> DocParseErrorCategory {
        match self {
            DocParseErrorKind::UnexpectedToken { .. }
            | DocParseErrorKind::UnexpectedEndOfInput { .. }
            | DocParseErrorKind::RecursionLimitExceeded => {
                DocParseErrorCategory::Syntax
            },
            DocParseErrorKind::NotImported { .. }
            | DocParseErrorKind::TypeNotFound { .. }
            | DocParseErrorKind::NotAnAnnotation { .. }
            | DocParseErrorKind::TargetNotAllowed { .. }
            | DocParseErrorKind::UnknownField { .. }
            | DocParseErrorKind::NoValuesAccepted { .. }
            | DocParseErrorKind::TypeMismatch { .. }
            | DocParseErrorKind::CreationFailed { .. }
            | DocParseErrorKind::InvalidMetaAnnotation { .. } => {
                DocParseErrorCategory::Semantic
            },
        }
    }
}
