//! Turns a grouped argument map into a constructed [`Annotation`],
//! validating field names and declared field types along the way.

use crate::Annotation;
use crate::AnnotationArray;
use crate::AnnotationTypeMetadata;
use crate::AnnotationValue;
use crate::DocParseError;
use crate::FieldType;
use crate::TypeRegistry;
use crate::annotation_type_metadata::Construction;
use indexmap::IndexMap;
use libdocannot_lexer::DocSourceSpan;

type Result<T> = std::result::Result<T, DocParseError>;

/// Where an annotation is being constructed, for diagnostics.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ConstructionSite<'a> {
    /// The annotation name as written, before resolution.
    pub original_name: &'a str,
    pub label: &'a str,
    pub span: Option<DocSourceSpan>,
}

pub(crate) fn construct_annotation(
    metadata: &AnnotationTypeMetadata,
    values: IndexMap<String, AnnotationValue>,
    registry: &dyn TypeRegistry,
    site: &ConstructionSite<'_>,
) -> Result<Annotation> {
    match metadata.construction() {
        Construction::Meta(kind) => {
            let annotation = Annotation::new(metadata.type_name(), values);
            kind.validate(&annotation).map_err(|err| {
                DocParseError::invalid_meta_annotation(
                    kind.short_name(),
                    site.label,
                    err.to_string(),
                    site.span,
                )
            })?;
            Ok(annotation)
        },

        Construction::Initializer(initializer) => initializer
            .call(&values)
            .map(|fields| Annotation::new(metadata.type_name(), fields))
            .map_err(|reason| {
                DocParseError::creation_failed(
                    site.original_name,
                    site.label,
                    reason,
                    site.span,
                )
            }),

        Construction::Fields => {
            let mut fields: IndexMap<String, AnnotationValue> = metadata
                .fields()
                .iter()
                .map(|(name, field)| (name.clone(), field.default.clone()))
                .collect();

            for (property, value) in &values {
                let field = if metadata.fields().contains_key(property) {
                    property.as_str()
                } else if property != "value" {
                    return Err(DocParseError::unknown_field(
                        site.original_name,
                        site.label,
                        property,
                        metadata.fields().keys().cloned().collect(),
                        site.span,
                    ));
                } else {
                    match metadata.default_field() {
                        Some(default_field) => default_field,
                        None => {
                            return Err(DocParseError::no_values_accepted(
                                site.original_name,
                                site.label,
                                &render_values(&values),
                                site.span,
                            ));
                        },
                    }
                };

                let value = check_field_type(
                    metadata,
                    field,
                    value.clone(),
                    registry,
                    site,
                )?;
                fields.insert(field.to_string(), value);
            }

            Ok(Annotation::new(metadata.type_name(), fields))
        },
    }
}

/// Validates `value` against the field's `@var` declaration.
///
/// `null` and undeclared fields are never checked. A scalar assigned to an
/// array-typed field is wrapped into a one-element array.
fn check_field_type(
    metadata: &AnnotationTypeMetadata,
    field: &str,
    value: AnnotationValue,
    registry: &dyn TypeRegistry,
    site: &ConstructionSite<'_>,
) -> Result<AnnotationValue> {
    if value.is_null() {
        return Ok(value);
    }
    let Some(field_type) = metadata.field_type(field) else {
        return Ok(value);
    };

    match field_type {
        FieldType::Array { element } => {
            let array = match value {
                AnnotationValue::Array(array) => array,
                single => std::iter::once(single).collect::<AnnotationArray>(),
            };
            if let Some(element) = element
                && let Some(bad_item) =
                    array.values().find(|item| !element.matches(item, registry))
            {
                return Err(DocParseError::type_mismatch(
                    site.original_name,
                    site.label,
                    field,
                    format!(
                        "either a(n) {0}, or an array of {0}s",
                        element.name(),
                    ),
                    bad_item.describe(),
                    site.span,
                ));
            }
            Ok(AnnotationValue::Array(array))
        },

        FieldType::Single { declared, literal } => {
            if declared.matches(&value, registry) {
                Ok(value)
            } else {
                Err(DocParseError::type_mismatch(
                    site.original_name,
                    site.label,
                    field,
                    format!("a(n) {literal}"),
                    value.describe(),
                    site.span,
                ))
            }
        },
    }
}

fn render_values(values: &IndexMap<String, AnnotationValue>) -> String {
    let rendered = values
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{rendered}}}")
}
