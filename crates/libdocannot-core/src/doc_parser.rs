//! Recursive-descent parser for the annotation grammar:
//!
//! ```text
//! Annotations     ::= { skip-until '@' ; Annotation }*
//! Annotation      ::= '@' Name [ '(' [Values] ')' ]
//! Name            ::= NamePart { '\' NamePart }*
//! Values          ::= '{' Value '}' | Value { ',' Value }*
//! Value           ::= FieldAssignment | PlainValue
//! FieldAssignment ::= identifier '=' PlainValue
//! PlainValue      ::= string | integer | float | true | false | null
//!                   | Array | Annotation
//! Array           ::= '{' ArrayEntry { ',' ArrayEntry }* [','] '}'
//! ArrayEntry      ::= (string | integer) '=' PlainValue | Value
//! ```
//!
//! Names are resolved and annotations constructed as soon as each
//! `@Name(...)` is recognized, so the first problem found (syntax or
//! semantic) aborts the parse.

use crate::Annotation;
use crate::AnnotationArray;
use crate::AnnotationEngine;
use crate::AnnotationValue;
use crate::ArrayKey;
use crate::ConsumerMetadata;
use crate::DocParseError;
use crate::ResolutionScope;
use crate::TargetKind;
use crate::value_constructor::ConstructionSite;
use crate::value_constructor::construct_annotation;
use indexmap::IndexMap;
use libdocannot_lexer::DocSourceSpan;
use libdocannot_lexer::DocTokenStream;
use libdocannot_lexer::token::DocToken;
use libdocannot_lexer::token::DocTokenKind;
use libdocannot_lexer::token_source::StrDocTokenSource;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

type Result<T> = std::result::Result<T, DocParseError>;

/// Characters trimmed from both ends of the text before lexing.
const TRIM_CHARS: [char; 3] = ['*', '/', ' '];

/// Everything a single parse call needs besides the text itself.
pub(crate) struct ParseContext<'a> {
    pub label: &'a str,
    pub target: TargetKind,
    pub scope: Cow<'a, ResolutionScope>,
    pub ignored: &'a HashSet<String>,
    pub ignore_unimported: bool,
    pub consumer: Option<Arc<ConsumerMetadata>>,
    /// Only the built-in meta-annotations exist. Used when reading a type's
    /// own doc comment.
    pub meta_only: bool,
}

/// One parsed entry of an argument list.
enum ParsedValue<'src> {
    Field(String, AnnotationValue),
    /// An unnamed value and the token it starts at.
    Plain(AnnotationValue, Option<DocToken<'src>>),
    /// A nested annotation dropped by an ignore policy.
    Dropped,
}

pub(crate) struct DocParser<'src, 'a> {
    engine: &'a AnnotationEngine,
    ctx: ParseContext<'a>,
    tokens: DocTokenStream<'src, StrDocTokenSource<'src>>,
    is_nested: bool,
    recursion_depth: usize,
}

impl<'src, 'a> DocParser<'src, 'a> {
    /// Maximum nesting depth of annotations and arrays.
    const MAX_RECURSION_DEPTH: usize = 64;

    /// Prepares a parser over `source`, or returns `None` if the text holds
    /// no `@` at all.
    ///
    /// Lexing starts one character before the first `@` (so an `@` glued to
    /// preceding text is still recognized as glued) with `*`, `/` and spaces
    /// trimmed from both ends.
    pub(crate) fn new(
        engine: &'a AnnotationEngine,
        ctx: ParseContext<'a>,
        source: &'src str,
    ) -> Option<Self> {
        let first_at = memchr::memchr(b'@', source.as_bytes())?;
        let start = source[..first_at]
            .char_indices()
            .next_back()
            .map_or(first_at, |(idx, _)| idx);
        let rest = &source[start..];
        let trimmed_start =
            start + (rest.len() - rest.trim_start_matches(TRIM_CHARS).len());
        let trimmed_end = start + rest.trim_end_matches(TRIM_CHARS).len();

        Some(Self {
            engine,
            ctx,
            tokens: DocTokenStream::new(StrDocTokenSource::with_range(
                source,
                trimmed_start,
                trimmed_end,
            )),
            is_nested: false,
            recursion_depth: 0,
        })
    }

    /// Parses every top-level annotation in the text.
    pub(crate) fn parse(mut self) -> Result<Vec<Annotation>> {
        let mut annotations = Vec::new();

        while let Some((kind, span, after_prose)) = self
            .tokens
            .lookahead()
            .map(|token| (token.kind, token.span, token.preceding_prose.is_some()))
        {
            if kind != DocTokenKind::At {
                self.tokens.advance();
                continue;
            }

            // An `@` glued to the preceding token or prose (`foo@bar`,
            // `` `@Foo` ``) is prose.
            let glued = after_prose
                || self
                    .tokens
                    .current()
                    .is_some_and(|prev| prev.span.is_directly_followed_by(&span));
            if glued {
                self.tokens.advance();
                continue;
            }

            // So is an `@` not immediately followed by a name.
            let starts_name = self.tokens.glimpse().is_some_and(|next| {
                (next.kind == DocTokenKind::NamespaceSeparator
                    || next.kind.is_name_part())
                    && span.is_directly_followed_by(&next.span)
            });
            if !starts_name {
                self.tokens.advance();
                continue;
            }

            self.is_nested = false;
            if let Some(annotation) = self.parse_annotation()? {
                annotations.push(annotation);
            }
        }

        Ok(annotations)
    }

    // =========================================================================
    // Token expectation helpers
    // =========================================================================

    fn expect(&mut self, kind: DocTokenKind) -> Result<DocToken<'src>> {
        self.expect_any(&[kind])
    }

    fn expect_any(&mut self, kinds: &[DocTokenKind]) -> Result<DocToken<'src>> {
        if self.tokens.is_next_any(kinds)
            && let Some(token) = self.tokens.advance()
        {
            return Ok(token);
        }
        let expected = kinds
            .iter()
            .map(DocTokenKind::describe)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(self.syntax_error(&expected))
    }

    /// A syntax error reporting the lookahead token (or end of input) as
    /// what was found instead of `expected`.
    fn syntax_error(&mut self, expected: &str) -> DocParseError {
        let found = self
            .tokens
            .lookahead()
            .map(|token| (token.text.to_string(), token.span));
        DocParseError::syntax(
            expected,
            found.as_ref().map(|(text, span)| (text.as_str(), *span)),
            self.ctx.label,
        )
    }

    fn enter_recursion(&mut self, span: DocSourceSpan) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > Self::MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            return Err(DocParseError::recursion_limit(Some(span), self.ctx.label));
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// Parses `@Name[(...)]`.
    ///
    /// Returns `Ok(None)` when the annotation is dropped by an ignore
    /// policy. A dropped top-level annotation leaves its argument list
    /// unconsumed (it is skipped as prose); a dropped nested one consumes
    /// it.
    fn parse_annotation(&mut self) -> Result<Option<Annotation>> {
        let at = self.expect(DocTokenKind::At)?;
        self.enter_recursion(at.span)?;
        let result = self.parse_annotation_impl(at.span);
        self.exit_recursion();
        result
    }

    fn parse_annotation_impl(
        &mut self,
        at_span: DocSourceSpan,
    ) -> Result<Option<Annotation>> {
        let (original_name, name_end) = self.parse_annotation_name(at_span)?;
        let span = Some(DocSourceSpan::new(
            at_span.start_inclusive,
            name_end.end_exclusive,
        ));
        let label = self.ctx.label;

        let Some(type_name) = self.resolve(&original_name) else {
            if self.ctx.ignore_unimported || self.is_ignored(&original_name) {
                log::debug!("dropping unresolved annotation @{original_name} in {label}");
                self.skip_dropped_arguments()?;
                return Ok(None);
            }
            return Err(DocParseError::not_imported(&original_name, label, span));
        };

        if !self.engine.type_exists(&type_name, self.ctx.meta_only) {
            return Err(DocParseError::type_not_found(&type_name, label, span));
        }

        let metadata = self.engine.metadata_for(&type_name)?;

        if !metadata.is_annotation() {
            if self.is_ignored(&original_name) {
                log::debug!("dropping ignored non-annotation @{original_name} in {label}");
                self.skip_dropped_arguments()?;
                return Ok(None);
            }
            return Err(DocParseError::not_an_annotation(
                &type_name,
                &original_name,
                label,
                span,
            ));
        }

        let target = if self.is_nested {
            TargetKind::Annotation
        } else {
            self.ctx.target
        };
        self.is_nested = true;

        if !metadata.targets().allows(target) {
            return Err(DocParseError::target_not_allowed(
                &original_name,
                label,
                target.as_str(),
                metadata.targets_literal(),
                span,
            ));
        }

        let mut values = IndexMap::new();
        if self.tokens.is_next(DocTokenKind::OpenParen) {
            self.tokens.advance();
            if !self.tokens.is_next(DocTokenKind::CloseParen) {
                values = self.parse_values()?;
            }
            self.expect(DocTokenKind::CloseParen)?;
        }

        construct_annotation(
            &metadata,
            values,
            self.engine.registry(),
            &ConstructionSite {
                original_name: &original_name,
                label,
                span,
            },
        )
        .map(Some)
    }

    /// Parses the name after `@`. Returns the name as written (a leading
    /// `\` included) and the span of its last segment.
    ///
    /// Segments are joined only while each `\` directly follows the
    /// previous segment.
    fn parse_annotation_name(
        &mut self,
        at_span: DocSourceSpan,
    ) -> Result<(String, DocSourceSpan)> {
        let mut name = String::new();
        let mut last_span = at_span;

        if self.tokens.is_next_any(&DocTokenKind::NAME_PARTS) {
            let part = self.expect_any(&DocTokenKind::NAME_PARTS)?;
            name.push_str(&part.text);
            last_span = part.span;
        } else if !self.tokens.is_next(DocTokenKind::NamespaceSeparator) {
            return Err(self.syntax_error("namespace separator or identifier"));
        }

        loop {
            let adjacent_separator = self.tokens.lookahead().is_some_and(|token| {
                token.kind == DocTokenKind::NamespaceSeparator
                    && last_span.is_directly_followed_by(&token.span)
            });
            if !adjacent_separator {
                break;
            }
            self.tokens.advance();
            let part = self.expect_any(&DocTokenKind::NAME_PARTS)?;
            name.push('\\');
            name.push_str(&part.text);
            last_span = part.span;
        }

        if name.is_empty() {
            return Err(self.syntax_error("identifier"));
        }
        Ok((name, last_span))
    }

    fn resolve(&self, raw_name: &str) -> Option<String> {
        self.engine.resolve_in(
            raw_name,
            &self.ctx.scope,
            self.ctx.consumer.as_deref(),
            self.ctx.meta_only,
        )
    }

    fn is_ignored(&self, raw_name: &str) -> bool {
        self.ctx.ignored.contains(raw_name)
            || self
                .ctx
                .consumer
                .as_ref()
                .is_some_and(|consumer| consumer.ignored().contains(raw_name))
    }

    /// Consumes the balanced argument list of a dropped nested annotation.
    fn skip_dropped_arguments(&mut self) -> Result<()> {
        if !self.is_nested || !self.tokens.is_next(DocTokenKind::OpenParen) {
            return Ok(());
        }
        let mut depth = 0usize;
        loop {
            let Some(token) = self.tokens.advance() else {
                return Err(self.syntax_error(&DocTokenKind::CloseParen.describe()));
            };
            match token.kind {
                DocTokenKind::OpenParen => depth += 1,
                DocTokenKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                },
                _ => {},
            }
        }
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Parses an argument list and groups it into a field map.
    ///
    /// Field assignments bind by name (a repeated name keeps the last
    /// value). Unnamed values bind to `value`: the first one directly, each
    /// further one appended after promoting `value` to an array.
    fn parse_values(&mut self) -> Result<IndexMap<String, AnnotationValue>> {
        let mut values: IndexMap<String, AnnotationValue> = IndexMap::new();

        // `@Foo({...})` takes exactly one array.
        if self.tokens.is_next(DocTokenKind::OpenBrace) {
            if let Some(array) = self.parse_plain_value()? {
                values.insert("value".to_string(), array);
            }
            return Ok(values);
        }

        let mut parsed = vec![self.parse_value()?];
        while self.tokens.is_next(DocTokenKind::Comma) {
            self.tokens.advance();
            parsed.push(self.parse_value()?);
        }

        for item in parsed {
            match item {
                ParsedValue::Field(name, value) => {
                    values.insert(name, value);
                },
                ParsedValue::Plain(value, start) => match values.get_mut("value") {
                    None | Some(AnnotationValue::Null) => {
                        values.insert("value".to_string(), value);
                    },
                    Some(AnnotationValue::Array(array)) => {
                        if array.try_push(value).is_err() {
                            return Err(self.no_free_index_error(start.as_ref()));
                        }
                    },
                    Some(existing) => {
                        let first = std::mem::replace(existing, AnnotationValue::Null);
                        *existing = AnnotationValue::Array(
                            [first, value].into_iter().collect(),
                        );
                    },
                },
                ParsedValue::Dropped => {},
            }
        }
        Ok(values)
    }

    /// `Value ::= FieldAssignment | PlainValue`, decided by whether the
    /// token after the lookahead is `=`.
    fn parse_value(&mut self) -> Result<ParsedValue<'src>> {
        let is_assignment = self
            .tokens
            .glimpse()
            .is_some_and(|token| token.kind == DocTokenKind::Equals);
        if is_assignment {
            return self.parse_field_assignment();
        }
        let start = self.tokens.lookahead().cloned();
        Ok(match self.parse_plain_value()? {
            Some(value) => ParsedValue::Plain(value, start),
            None => ParsedValue::Dropped,
        })
    }

    fn parse_field_assignment(&mut self) -> Result<ParsedValue<'src>> {
        let name = self.expect(DocTokenKind::Identifier)?;
        self.expect(DocTokenKind::Equals)?;
        Ok(match self.parse_plain_value()? {
            Some(value) => ParsedValue::Field(name.text.into_owned(), value),
            None => ParsedValue::Dropped,
        })
    }

    /// Parses a literal, array or nested annotation. `Ok(None)` means a
    /// nested annotation was dropped by an ignore policy.
    fn parse_plain_value(&mut self) -> Result<Option<AnnotationValue>> {
        let Some(kind) = self.tokens.lookahead().map(|token| token.kind) else {
            return Err(self.syntax_error("value"));
        };

        match kind {
            DocTokenKind::OpenBrace => {
                self.parse_array().map(|array| Some(AnnotationValue::Array(array)))
            },
            DocTokenKind::At => {
                Ok(self.parse_annotation()?.map(AnnotationValue::from))
            },
            DocTokenKind::String => {
                let token = self.expect(DocTokenKind::String)?;
                let text = token.parse_string_value().unwrap_or_default();
                Ok(Some(AnnotationValue::String(text.into_owned())))
            },
            DocTokenKind::Integer => {
                let token = self.expect(DocTokenKind::Integer)?;
                Ok(token.parse_int_value().map(AnnotationValue::Int))
            },
            DocTokenKind::Float => {
                let token = self.expect(DocTokenKind::Float)?;
                match token.parse_float_value() {
                    Some(Ok(value)) => Ok(Some(AnnotationValue::Float(value))),
                    _ => Err(DocParseError::syntax(
                        "float",
                        Some((token.text.as_ref(), token.span)),
                        self.ctx.label,
                    )),
                }
            },
            DocTokenKind::True => {
                self.tokens.advance();
                Ok(Some(AnnotationValue::Bool(true)))
            },
            DocTokenKind::False => {
                self.tokens.advance();
                Ok(Some(AnnotationValue::Bool(false)))
            },
            DocTokenKind::Null => {
                self.tokens.advance();
                Ok(Some(AnnotationValue::Null))
            },
            _ => Err(self.syntax_error("value")),
        }
    }

    // =========================================================================
    // Arrays
    // =========================================================================

    fn parse_array(&mut self) -> Result<AnnotationArray> {
        let open = self.expect(DocTokenKind::OpenBrace)?;
        self.enter_recursion(open.span)?;
        let result = self.parse_array_impl();
        self.exit_recursion();
        result
    }

    fn parse_array_impl(&mut self) -> Result<AnnotationArray> {
        let mut array = AnnotationArray::new();
        self.parse_array_entry(&mut array)?;

        while self.tokens.is_next(DocTokenKind::Comma) {
            self.tokens.advance();
            // Trailing comma.
            if self.tokens.is_next(DocTokenKind::CloseBrace) {
                break;
            }
            self.parse_array_entry(&mut array)?;
        }

        self.expect(DocTokenKind::CloseBrace)?;
        Ok(array)
    }

    fn parse_array_entry(&mut self, array: &mut AnnotationArray) -> Result<()> {
        let is_keyed = self
            .tokens
            .glimpse()
            .is_some_and(|token| token.kind == DocTokenKind::Equals);

        if is_keyed {
            let key_token =
                self.expect_any(&[DocTokenKind::Integer, DocTokenKind::String])?;
            let key = match key_token.parse_string_value() {
                Some(text) => ArrayKey::from_text(&text),
                None => ArrayKey::from_text(&key_token.text),
            };
            self.expect(DocTokenKind::Equals)?;
            if let Some(value) = self.parse_plain_value()? {
                array.insert(key, value);
            }
        } else {
            let start = self.tokens.lookahead().cloned();
            if let Some(value) = self.parse_plain_value()?
                && array.try_push(value).is_err()
            {
                return Err(self.no_free_index_error(start.as_ref()));
            }
        }
        Ok(())
    }

    /// An unkeyed entry after key `i64::MAX` has no integer key left.
    fn no_free_index_error(&self, entry: Option<&DocToken<'_>>) -> DocParseError {
        DocParseError::syntax(
            "explicit array key",
            entry.map(|token| (token.text.as_ref(), token.span)),
            self.ctx.label,
        )
    }
}
