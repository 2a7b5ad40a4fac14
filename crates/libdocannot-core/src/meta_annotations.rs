//! The built-in meta-annotations an annotation type or consumer type uses
//! to describe itself in its own doc comment.
//!
//! - `@Target("CLASS")` / `@Target({"METHOD", "PROPERTY"})` restricts where
//!   an annotation type may be used.
//! - `@IgnoreAnnotation("name")` / `@IgnoreAnnotation({"a", "b"})` adds raw
//!   names to a consumer type's ignore set.
//! - `@Import(alias="orm", name="Doctrine\ORM\Mapping")` or
//!   `@Import("Doctrine\ORM\Mapping")` adds an import alias to a consumer
//!   type. Without `alias` the last name segment is used.
//!
//! These are always resolved through a fixed import table, independent of
//! any caller configuration.

use crate::Annotation;
use crate::AnnotationTypeMetadata;
use crate::AnnotationValue;
use crate::ResolutionScope;
use crate::TargetKind;
use crate::Targets;
use crate::UnknownTargetError;
use std::sync::LazyLock;

pub const META_NAMESPACE: &str = "Docannot\\Meta";
pub const TARGET_TYPE: &str = "Docannot\\Meta\\Target";
pub const IGNORE_ANNOTATION_TYPE: &str = "Docannot\\Meta\\IgnoreAnnotation";
pub const IMPORT_TYPE: &str = "Docannot\\Meta\\Import";

static META_SCOPE: LazyLock<ResolutionScope> = LazyLock::new(|| {
    let mut scope = ResolutionScope::new();
    for kind in MetaAnnotationKind::ALL {
        scope.imports.insert(
            kind.short_name().to_lowercase(),
            kind.type_name().to_string(),
        );
    }
    scope
});

/// The import table used when reading a type's own doc comment.
pub(crate) fn meta_scope() -> &'static ResolutionScope {
    &META_SCOPE
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum MetaAnnotationKind {
    Target,
    IgnoreAnnotation,
    Import,
}

impl MetaAnnotationKind {
    pub(crate) const ALL: [MetaAnnotationKind; 3] = [
        MetaAnnotationKind::Target,
        MetaAnnotationKind::IgnoreAnnotation,
        MetaAnnotationKind::Import,
    ];

    pub(crate) fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == type_name)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            MetaAnnotationKind::Target => TARGET_TYPE,
            MetaAnnotationKind::IgnoreAnnotation => IGNORE_ANNOTATION_TYPE,
            MetaAnnotationKind::Import => IMPORT_TYPE,
        }
    }

    pub(crate) fn short_name(&self) -> &'static str {
        match self {
            MetaAnnotationKind::Target => "Target",
            MetaAnnotationKind::IgnoreAnnotation => "IgnoreAnnotation",
            MetaAnnotationKind::Import => "Import",
        }
    }

    /// Metadata for the meta-annotation type itself: usable only on types
    /// and taking its values through an initializer.
    pub(crate) fn metadata(&self) -> AnnotationTypeMetadata {
        AnnotationTypeMetadata::for_meta_annotation(*self)
    }

    /// Checks that a constructed meta-annotation carries usable values.
    pub(crate) fn validate(
        &self,
        annotation: &Annotation,
    ) -> Result<(), MetaAnnotationError> {
        match self {
            MetaAnnotationKind::Target => {
                TargetAnnotation::try_from(annotation).map(|_| ())
            },
            MetaAnnotationKind::IgnoreAnnotation => {
                IgnoreAnnotation::try_from(annotation).map(|_| ())
            },
            MetaAnnotationKind::Import => {
                ImportAnnotation::try_from(annotation).map(|_| ())
            },
        }
    }
}

/// Why a meta-annotation's values could not be used.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MetaAnnotationError {
    #[error("expected an annotation of type {expected}, but got {found}")]
    WrongType {
        expected: &'static str,
        found: String,
    },

    #[error("@{annotation} expects either a string value, or an array of strings")]
    ExpectedStrings { annotation: &'static str },

    #[error(transparent)]
    UnknownTarget(#[from] UnknownTargetError),

    #[error("@Import expects a \"name\" (or unnamed) string value")]
    MissingImportName,

    #[error("@Import expects \"alias\" to be a string")]
    InvalidImportAlias,
}

fn check_type(
    annotation: &Annotation,
    kind: MetaAnnotationKind,
) -> Result<(), MetaAnnotationError> {
    if annotation.type_name() == kind.type_name() {
        Ok(())
    } else {
        Err(MetaAnnotationError::WrongType {
            expected: kind.type_name(),
            found: annotation.type_name().to_string(),
        })
    }
}

/// Reads a string or an array of strings.
fn strings(
    value: Option<&AnnotationValue>,
    annotation: &'static str,
) -> Result<Vec<String>, MetaAnnotationError> {
    match value {
        Some(AnnotationValue::String(s)) => Ok(vec![s.clone()]),
        Some(AnnotationValue::Array(arr)) => arr
            .values()
            .map(|item| match item {
                AnnotationValue::String(s) => Ok(s.clone()),
                _ => Err(MetaAnnotationError::ExpectedStrings { annotation }),
            })
            .collect(),
        _ => Err(MetaAnnotationError::ExpectedStrings { annotation }),
    }
}

/// Typed view of a constructed `@Target`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetAnnotation {
    pub targets: Targets,
    /// Target names exactly as listed, comma separated.
    pub literal: String,
}

impl TryFrom<&Annotation> for TargetAnnotation {
    type Error = MetaAnnotationError;

    fn try_from(annotation: &Annotation) -> Result<Self, Self::Error> {
        check_type(annotation, MetaAnnotationKind::Target)?;
        let names = strings(annotation.get("value"), "Target")?;
        let targets = names
            .iter()
            .map(|name| name.parse::<TargetKind>())
            .collect::<Result<Targets, _>>()?;
        Ok(Self {
            targets,
            literal: names.join(", "),
        })
    }
}

/// Typed view of a constructed `@IgnoreAnnotation`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IgnoreAnnotation {
    pub names: Vec<String>,
}

impl TryFrom<&Annotation> for IgnoreAnnotation {
    type Error = MetaAnnotationError;

    fn try_from(annotation: &Annotation) -> Result<Self, Self::Error> {
        check_type(annotation, MetaAnnotationKind::IgnoreAnnotation)?;
        Ok(Self {
            names: strings(annotation.get("value"), "IgnoreAnnotation")?,
        })
    }
}

/// Typed view of a constructed `@Import`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportAnnotation {
    /// Lower-case alias.
    pub alias: String,
    pub name: String,
}

impl TryFrom<&Annotation> for ImportAnnotation {
    type Error = MetaAnnotationError;

    fn try_from(annotation: &Annotation) -> Result<Self, Self::Error> {
        check_type(annotation, MetaAnnotationKind::Import)?;
        let name = annotation
            .get("name")
            .or_else(|| annotation.get("value"))
            .and_then(AnnotationValue::as_str)
            .map(|name| name.trim_start_matches('\\'))
            .filter(|name| !name.is_empty())
            .ok_or(MetaAnnotationError::MissingImportName)?;
        let alias = match annotation.get("alias") {
            None | Some(AnnotationValue::Null) => {
                name.rsplit('\\').next().unwrap_or(name)
            },
            Some(AnnotationValue::String(alias)) => alias.as_str(),
            Some(_) => return Err(MetaAnnotationError::InvalidImportAlias),
        };
        Ok(Self {
            alias: alias.to_lowercase(),
            name: name.to_string(),
        })
    }
}
