use crate::DocErrorNote;
use crate::DocErrorNoteKind;
use crate::DocErrorNotes;
use crate::DocParseErrorCategory;
use crate::DocParseErrorKind;
use libdocannot_lexer::DocSourceSpan;

/// A fatal error from parsing one docblock.
///
/// Any error aborts the whole parse; no partial list of annotations is
/// returned alongside it.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct DocParseError {
    /// Full human-readable message, including the diagnostic label.
    message: String,

    kind: DocParseErrorKind,

    /// Where the error was detected. `None` when the input ended early or
    /// the error concerns a type rather than a place in the text.
    span: Option<DocSourceSpan>,

    notes: DocErrorNotes,
}

impl DocParseError {
    pub fn new(
        message: impl Into<String>,
        kind: DocParseErrorKind,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self {
            message: message.into(),
            kind,
            span,
            notes: DocErrorNotes::new(),
        }
    }

    /// An unexpected token (or end of input) where `expected` should have
    /// been.
    pub(crate) fn syntax(
        expected: impl Into<String>,
        found: Option<(&str, DocSourceSpan)>,
        label: &str,
    ) -> Self {
        let expected = expected.into();
        let (got, kind, span) = match found {
            None => (
                "end of string".to_string(),
                DocParseErrorKind::UnexpectedEndOfInput {
                    expected: expected.clone(),
                },
                None,
            ),
            Some((text, span)) => {
                let position = span.start_inclusive.byte_offset();
                (
                    format!("'{text}' at position {position}"),
                    DocParseErrorKind::UnexpectedToken {
                        expected: expected.clone(),
                        found: text.to_string(),
                        position,
                    },
                    Some(span),
                )
            },
        };
        Self::new(
            format!("Expected {expected}, got {got}{}.", in_label(label)),
            kind,
            span,
        )
    }

    pub(crate) fn recursion_limit(
        span: Option<DocSourceSpan>,
        label: &str,
    ) -> Self {
        Self::new(
            format!(
                "Annotations and arrays are nested too deeply{}.",
                in_label(label),
            ),
            DocParseErrorKind::RecursionLimitExceeded,
            span,
        )
    }

    pub(crate) fn not_imported(
        name: &str,
        label: &str,
        span: Option<DocSourceSpan>,
    ) -> Self {
        let mut err = Self::new(
            format!("The annotation \"@{name}\"{} was never imported.", in_label(label)),
            DocParseErrorKind::NotImported {
                name: name.to_string(),
            },
            span,
        );
        err.add_help(format!(
            "Import the annotation's namespace, or add @IgnoreAnnotation(\"{name}\") \
             to the consuming type's doc comment.",
        ));
        err
    }

    pub(crate) fn type_not_found(
        name: &str,
        label: &str,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!(
                "The annotation \"@{name}\"{} does not exist, or could not be auto-loaded.",
                in_label(label),
            ),
            DocParseErrorKind::TypeNotFound {
                name: name.to_string(),
            },
            span,
        )
    }

    pub(crate) fn not_an_annotation(
        type_name: &str,
        original_name: &str,
        label: &str,
        span: Option<DocSourceSpan>,
    ) -> Self {
        let mut err = Self::new(
            format!(
                "The type \"{type_name}\" is not annotated with @Annotation, so \
                 \"@{original_name}\"{} cannot be used as an annotation.",
                in_label(label),
            ),
            DocParseErrorKind::NotAnAnnotation {
                name: type_name.to_string(),
            },
            span,
        );
        err.add_help(format!(
            "If it is meant to be an annotation, add @Annotation to the doc \
             comment of \"{type_name}\".",
        ));
        err.add_help(format!(
            "Otherwise add @IgnoreAnnotation(\"{original_name}\") to the doc \
             comment of the consuming type.",
        ));
        err
    }

    pub(crate) fn target_not_allowed(
        name: &str,
        label: &str,
        target: &str,
        allowed: &str,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!(
                "Annotation @{name} is not allowed to be declared on {}. You may \
                 only use this annotation on these code elements: {allowed}.",
                describe_label(label),
            ),
            DocParseErrorKind::TargetNotAllowed {
                name: name.to_string(),
                target: target.to_string(),
                allowed: allowed.to_string(),
            },
            span,
        )
    }

    pub(crate) fn unknown_field(
        name: &str,
        label: &str,
        field: &str,
        available: Vec<String>,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!(
                "The annotation @{name} declared on {} does not have a property \
                 named \"{field}\". Available properties: {}",
                describe_label(label),
                available.join(", "),
            ),
            DocParseErrorKind::UnknownField {
                name: name.to_string(),
                field: field.to_string(),
                available,
            },
            span,
        )
    }

    pub(crate) fn no_values_accepted(
        name: &str,
        label: &str,
        values: &str,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!(
                "The annotation @{name} declared on {} does not accept any \
                 values, but got {values}.",
                describe_label(label),
            ),
            DocParseErrorKind::NoValuesAccepted {
                name: name.to_string(),
            },
            span,
        )
    }

    pub(crate) fn type_mismatch(
        name: &str,
        label: &str,
        field: &str,
        expected: String,
        actual: String,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!(
                "[Type Error] Attribute \"{field}\" of @{name} declared on {} \
                 expects {expected}, but got {actual}.",
                describe_label(label),
            ),
            DocParseErrorKind::TypeMismatch {
                name: name.to_string(),
                field: field.to_string(),
                expected,
                actual,
            },
            span,
        )
    }

    pub(crate) fn creation_failed(
        name: &str,
        label: &str,
        reason: String,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!(
                "The annotation @{name} declared on {} could not be created: {reason}",
                describe_label(label),
            ),
            DocParseErrorKind::CreationFailed {
                name: name.to_string(),
                reason,
            },
            span,
        )
    }

    pub(crate) fn invalid_meta_annotation(
        name: &str,
        label: &str,
        reason: String,
        span: Option<DocSourceSpan>,
    ) -> Self {
        Self::new(
            format!("Invalid @{name} declared on {}: {reason}", describe_label(label)),
            DocParseErrorKind::InvalidMetaAnnotation {
                name: name.to_string(),
                reason,
            },
            span,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &DocParseErrorKind {
        &self.kind
    }

    pub fn category(&self) -> DocParseErrorCategory {
        self.kind.category()
    }

    pub fn is_syntax(&self) -> bool {
        self.category() == DocParseErrorCategory::Syntax
    }

    pub fn is_semantic(&self) -> bool {
        self.category() == DocParseErrorCategory::Semantic
    }

    pub fn span(&self) -> Option<&DocSourceSpan> {
        self.span.as_ref()
    }

    pub fn notes(&self) -> &DocErrorNotes {
        &self.notes
    }

    pub fn add_note(&mut self, message: impl Into<String>) {
        self.notes.push(DocErrorNote::general(message));
    }

    pub fn add_help(&mut self, message: impl Into<String>) {
        self.notes.push(DocErrorNote::help(message));
    }

    /// Formats this error as a multi-line diagnostic.
    ///
    /// Produces output like:
    /// ```text
    /// error: Expected `)`, got 'x' at position 12 in class Foo.
    ///   --> 2:10
    ///    |
    ///  2 |  * @Route("/" x)
    ///    |               ^
    ///    = help: ...
    /// ```
    ///
    /// `source` must be the same text that was parsed for the snippet to
    /// line up. Without it only the location line is shown.
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = String::new();

        output.push_str("error: ");
        output.push_str(&self.message);
        output.push('\n');

        if let Some(span) = &self.span {
            let line = span.start_inclusive.line() + 1;
            let column = span.start_inclusive.col() + 1;
            output.push_str(&format!("  --> {line}:{column}\n"));

            if let Some(src) = source
                && let Some(snippet) = format_source_snippet(src, span)
            {
                output.push_str(&snippet);
            }
        }

        for note in &self.notes {
            let prefix = match note.kind {
                DocErrorNoteKind::General => "note",
                DocErrorNoteKind::Help => "help",
            };
            output.push_str(&format!("   = {prefix}: {}\n", note.message));
        }

        output
    }
}

fn format_source_snippet(source: &str, span: &DocSourceSpan) -> Option<String> {
    let line_num = span.start_inclusive.line();
    let line_content = source.lines().nth(line_num)?;
    let display_line_num = line_num + 1;
    let width = display_line_num.to_string().len().max(2);

    let col_start = span.start_inclusive.col();
    let underline_len = if span.end_exclusive.line() == line_num
        && span.end_exclusive.col() > col_start
    {
        span.end_exclusive.col() - col_start
    } else {
        1
    };

    let mut output = String::new();
    output.push_str(&format!("{:>width$} |\n", ""));
    output.push_str(&format!("{display_line_num:>width$} | {line_content}\n"));
    output.push_str(&format!(
        "{:>width$} | {:>col_start$}{}\n",
        "",
        "",
        "^".repeat(underline_len),
    ));
    Some(output)
}

fn in_label(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!(" in {label}")
    }
}

fn describe_label(label: &str) -> &str {
    if label.is_empty() { "<unknown>" } else { label }
}
