use crate::ANNOTATION_MARKER;
use crate::Annotation;
use crate::AnnotationMetadataCache;
use crate::AnnotationTypeMetadata;
use crate::ConsumerMetadata;
use crate::ConsumerMetadataCache;
use crate::DocParseError;
use crate::IgnoreAnnotation;
use crate::ImportAnnotation;
use crate::ParseOptions;
use crate::ResolutionScope;
use crate::TargetAnnotation;
use crate::TargetKind;
use crate::TypeRegistry;
use crate::consumer_metadata::namespace_of;
use crate::doc_parser::DocParser;
use crate::doc_parser::ParseContext;
use crate::meta_annotations::MetaAnnotationKind;
use crate::meta_annotations::meta_scope;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

type Result<T> = std::result::Result<T, DocParseError>;

/// Parses doc comments into [`Annotation`]s against a [`TypeRegistry`].
///
/// An engine caches what it learns about annotation types and consumer types
/// for its whole lifetime, so one engine should be shared (it is `Send` and
/// `Sync`) rather than created per parse.
///
/// ```
/// use libdocannot_core::AnnotationEngine;
/// use libdocannot_core::FieldDescriptor;
/// use libdocannot_core::InMemoryTypeRegistry;
/// use libdocannot_core::ParseOptions;
/// use libdocannot_core::TargetKind;
/// use libdocannot_core::TypeDescriptor;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = InMemoryTypeRegistry::new().with_type(
///     "App\\Route",
///     TypeDescriptor::new("/** @Annotation */")
///         .with_field(FieldDescriptor::new("path")),
/// );
/// let engine = AnnotationEngine::new(Arc::new(registry));
/// let options = ParseOptions::new(TargetKind::Method).with_namespace("App")?;
///
/// let annotations = engine.parse(
///     "/** @Route(\"/home\") */",
///     "method HomeController::index()",
///     &options,
/// )?;
/// assert_eq!(annotations[0].type_name(), "App\\Route");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct AnnotationEngine {
    registry: Arc<dyn TypeRegistry>,
    annotation_metadata: AnnotationMetadataCache,
    consumer_metadata: ConsumerMetadataCache,
}

impl AnnotationEngine {
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self {
            registry,
            annotation_metadata: AnnotationMetadataCache::with_meta_annotations(),
            consumer_metadata: ConsumerMetadataCache::new(),
        }
    }

    pub fn registry(&self) -> &dyn TypeRegistry {
        self.registry.as_ref()
    }

    pub fn annotation_metadata(&self) -> &AnnotationMetadataCache {
        &self.annotation_metadata
    }

    pub fn consumer_metadata(&self) -> &ConsumerMetadataCache {
        &self.consumer_metadata
    }

    /// Parses every annotation in `text`, in source order.
    ///
    /// `label` names where the text came from (e.g. `"method Foo::bar()"`)
    /// and is only used in error messages. The first syntax or semantic
    /// problem aborts the parse; annotations dropped by an ignore policy are
    /// simply omitted.
    pub fn parse(
        &self,
        text: &str,
        label: &str,
        options: &ParseOptions,
    ) -> Result<Vec<Annotation>> {
        let consumer = self.consumer_for(options)?;
        let ctx = ParseContext {
            label,
            target: options.target(),
            scope: scope_for(consumer.as_deref(), options),
            ignored: options.ignored_names(),
            ignore_unimported: options.ignore_unimported(),
            consumer,
            meta_only: false,
        };
        log::debug!("parsing annotations in {label}");
        match DocParser::new(self, ctx, text) {
            Some(parser) => parser.parse(),
            None => Ok(Vec::new()),
        }
    }

    /// Resolves a raw annotation name the way [`parse`](Self::parse) would
    /// with the same options, without parsing anything.
    pub fn resolve(
        &self,
        raw_name: &str,
        options: &ParseOptions,
    ) -> Result<Option<String>> {
        let consumer = self.consumer_for(options)?;
        let scope = scope_for(consumer.as_deref(), options);
        Ok(self.resolve_in(raw_name, &scope, consumer.as_deref(), false))
    }

    /// Resolves `raw_name` in `scope`, going through the consumer's
    /// resolved-name cache when there is a consumer.
    ///
    /// Only successful resolutions are remembered.
    pub(crate) fn resolve_in(
        &self,
        raw_name: &str,
        scope: &ResolutionScope,
        consumer: Option<&ConsumerMetadata>,
        meta_only: bool,
    ) -> Option<String> {
        if let Some(hit) = consumer.and_then(|consumer| consumer.resolved(raw_name)) {
            return Some(hit);
        }

        let resolved =
            scope.resolve(raw_name, |candidate| self.type_exists(candidate, meta_only));
        log::trace!("resolved @{raw_name} to {resolved:?}");

        if let (Some(consumer), Some(type_name)) = (consumer, &resolved) {
            consumer.remember(raw_name, type_name);
        }
        resolved
    }

    /// Returns the cached metadata for an annotation type, computing it on
    /// first use.
    ///
    /// The `@Target` of an annotation type is read from its own doc
    /// comment, which is parsed with only the built-in meta-annotations in
    /// scope.
    pub fn metadata_for(&self, type_name: &str) -> Result<Arc<AnnotationTypeMetadata>> {
        self.annotation_metadata.get_or_try_insert_with(type_name, || {
            let label = format!("class {type_name}");
            let descriptor = self
                .registry
                .describe(type_name)
                .ok_or_else(|| DocParseError::type_not_found(type_name, &label, None))?;

            let mut target = None;
            if descriptor.doc_comment.contains(ANNOTATION_MARKER) {
                for annotation in self.parse_own_doc_comment(&descriptor.doc_comment, &label)? {
                    if let Ok(found) = TargetAnnotation::try_from(&annotation) {
                        target = Some(found);
                    }
                }
            }

            Ok(AnnotationTypeMetadata::from_descriptor(type_name, &descriptor, target))
        })
    }

    /// Returns the cached resolution context of a consumer type, computing
    /// it on first use.
    ///
    /// The consumer's imports come from its descriptor and from `@Import`
    /// in its doc comment, its ignore set from `@IgnoreAnnotation`, and its
    /// own namespace is the fallback namespace.
    pub fn consumer_metadata_for(&self, type_name: &str) -> Result<Arc<ConsumerMetadata>> {
        let type_name = type_name.trim_start_matches('\\');
        self.consumer_metadata.get_or_try_insert_with(type_name, || {
            let label = format!("class {type_name}");
            let descriptor = self
                .registry
                .describe(type_name)
                .ok_or_else(|| DocParseError::type_not_found(type_name, &label, None))?;

            let mut scope = ResolutionScope::new();
            scope.imports = descriptor.imports.clone();
            if let Some(namespace) = namespace_of(type_name) {
                scope.namespaces.push(namespace.to_string());
            }

            let mut ignored = HashSet::new();
            for annotation in self.parse_own_doc_comment(&descriptor.doc_comment, &label)? {
                if let Ok(import) = ImportAnnotation::try_from(&annotation) {
                    scope.imports.insert(import.alias, import.name);
                } else if let Ok(ignore) = IgnoreAnnotation::try_from(&annotation) {
                    ignored.extend(ignore.names);
                }
            }

            log::debug!(
                "collected {} import(s) and {} ignored name(s) for consumer {type_name}",
                scope.imports.len(),
                ignored.len(),
            );
            Ok(ConsumerMetadata::new(type_name, scope, ignored))
        })
    }

    fn consumer_for(&self, options: &ParseOptions) -> Result<Option<Arc<ConsumerMetadata>>> {
        options
            .consumer_type()
            .map(|consumer_type| self.consumer_metadata_for(consumer_type))
            .transpose()
    }

    /// `true` if `type_name` names a known type. Only the built-in
    /// meta-annotations exist while reading a type's own doc comment.
    pub(crate) fn type_exists(&self, type_name: &str, meta_only: bool) -> bool {
        MetaAnnotationKind::from_type_name(type_name).is_some()
            || (!meta_only && self.registry.exists(type_name))
    }

    fn parse_own_doc_comment(
        &self,
        doc_comment: &str,
        label: &str,
    ) -> Result<Vec<Annotation>> {
        let ignored = HashSet::new();
        let ctx = ParseContext {
            label,
            target: TargetKind::Class,
            scope: Cow::Borrowed(meta_scope()),
            ignored: &ignored,
            ignore_unimported: true,
            consumer: None,
            meta_only: true,
        };
        log::trace!("reading meta-annotations of {label}");
        match DocParser::new(self, ctx, doc_comment) {
            Some(parser) => parser.parse(),
            None => Ok(Vec::new()),
        }
    }
}

/// The caller's scope, with the consumer's own imports and namespace layered
/// beneath it when there is a consumer.
fn scope_for<'a>(
    consumer: Option<&ConsumerMetadata>,
    options: &'a ParseOptions,
) -> Cow<'a, ResolutionScope> {
    match consumer {
        Some(consumer) => Cow::Owned(consumer.scope().layered_under(options.scope())),
        None => Cow::Borrowed(options.scope()),
    }
}

impl std::fmt::Debug for AnnotationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEngine")
            .field("annotation_metadata", &self.annotation_metadata.len())
            .field("consumer_metadata", &self.consumer_metadata.len())
            .finish_non_exhaustive()
    }
}
