use crate::AnnotationValue;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// A constructed annotation instance.
///
/// `type_name` is always the fully-qualified name the annotation resolved
/// to, never the alias written in the comment. For annotation types that
/// receive their values as public fields, `fields` holds every declared
/// field (unassigned ones keep their declared default). For types with an
/// initializer, `fields` is whatever the initializer produced.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Annotation {
    type_name: String,
    fields: IndexMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(
        type_name: impl Into<String>,
        fields: IndexMap<String, AnnotationValue>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// The fully-qualified name of this annotation's type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &IndexMap<String, AnnotationValue> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&AnnotationValue> {
        self.fields.get(field)
    }

    pub fn into_fields(self) -> IndexMap<String, AnnotationValue> {
        self.fields
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@\\{}(", self.type_name)?;
        for (idx, (name, value)) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, ")")
    }
}
