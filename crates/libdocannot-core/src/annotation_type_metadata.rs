use crate::AnnotationValue;
use crate::FieldType;
use crate::Initializer;
use crate::TargetAnnotation;
use crate::Targets;
use crate::TypeDescriptor;
use crate::meta_annotations::MetaAnnotationKind;
use indexmap::IndexMap;

/// The marker a type's doc comment must contain to be usable as an
/// annotation.
pub const ANNOTATION_MARKER: &str = "@Annotation";

/// How an annotation instance receives its values.
#[derive(Clone, Debug)]
pub(crate) enum Construction {
    /// Values are assigned to declared public fields one by one.
    Fields,
    /// All values are handed to the type's initializer at once.
    Initializer(Initializer),
    /// A built-in meta-annotation; values are stored as-is after
    /// validation.
    Meta(MetaAnnotationKind),
}

/// A declared public field of an annotation type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMetadata {
    /// `None` when the field has no `@var` declaration or declares `mixed`.
    pub field_type: Option<FieldType>,
    pub default: AnnotationValue,
}

/// Structural facts about one annotation type, computed once per type.
#[derive(Clone, Debug)]
pub struct AnnotationTypeMetadata {
    type_name: String,
    is_annotation: bool,
    targets: Targets,
    targets_literal: String,
    fields: IndexMap<String, FieldMetadata>,
    default_field: Option<String>,
    construction: Construction,
}

impl AnnotationTypeMetadata {
    /// Builds metadata from a registry description.
    ///
    /// `target` is the `@Target` found in the type's own doc comment, if
    /// any. Fields are only collected for annotation types that take their
    /// values field by field.
    pub(crate) fn from_descriptor(
        type_name: &str,
        descriptor: &TypeDescriptor,
        target: Option<TargetAnnotation>,
    ) -> Self {
        let is_annotation = descriptor.doc_comment.contains(ANNOTATION_MARKER);
        let construction = match &descriptor.initializer {
            Some(initializer) => Construction::Initializer(initializer.clone()),
            None => Construction::Fields,
        };

        let mut fields = IndexMap::new();
        if is_annotation && matches!(construction, Construction::Fields) {
            for field in &descriptor.fields {
                fields.insert(field.name.clone(), FieldMetadata {
                    field_type: field
                        .doc_comment
                        .as_deref()
                        .and_then(FieldType::from_doc_comment),
                    default: field.default.clone(),
                });
            }
        }
        let default_field = fields.keys().next().cloned();

        let (targets, targets_literal) = match target {
            Some(target) => (target.targets, target.literal),
            None => (Targets::ALL, Targets::ALL.literal()),
        };

        Self {
            type_name: type_name.to_string(),
            is_annotation,
            targets,
            targets_literal,
            fields,
            default_field,
            construction,
        }
    }

    pub(crate) fn for_meta_annotation(kind: MetaAnnotationKind) -> Self {
        let targets = Targets::CLASS;
        Self {
            type_name: kind.type_name().to_string(),
            is_annotation: true,
            targets,
            targets_literal: targets.literal(),
            fields: IndexMap::new(),
            default_field: None,
            construction: Construction::Meta(kind),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// `true` if the type's doc comment carries the `@Annotation` marker.
    pub fn is_annotation(&self) -> bool {
        self.is_annotation
    }

    /// `true` if the type takes all values through one initializer call
    /// instead of field by field.
    pub fn has_constructor(&self) -> bool {
        !matches!(self.construction, Construction::Fields)
    }

    pub fn targets(&self) -> Targets {
        self.targets
    }

    pub fn targets_literal(&self) -> &str {
        &self.targets_literal
    }

    pub fn fields(&self) -> &IndexMap<String, FieldMetadata> {
        &self.fields
    }

    pub fn field_type(&self, field: &str) -> Option<&FieldType> {
        self.fields.get(field)?.field_type.as_ref()
    }

    /// The field an unnamed value binds to: the first declared field.
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    pub(crate) fn construction(&self) -> &Construction {
        &self.construction
    }
}
