use crate::AnnotationValue;
use crate::TypeRegistry;
use regex::Regex;
use std::sync::LazyLock;

static VAR_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@var\s+(\S+)").expect("Invalid @var regex")
});

/// A type that a field's `@var` declaration can name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeclaredType {
    Boolean,
    Integer,
    Double,
    String,
    Array,
    /// Any other name: the value must be an annotation instance of it.
    Class(String),
}

impl DeclaredType {
    /// Maps a type name to a declared type. `mixed` declares nothing.
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mixed" => return None,
            "bool" | "boolean" => DeclaredType::Boolean,
            "int" | "integer" => DeclaredType::Integer,
            "float" | "double" => DeclaredType::Double,
            "string" => DeclaredType::String,
            "array" => DeclaredType::Array,
            other => {
                DeclaredType::Class(other.trim_start_matches('\\').to_string())
            },
        })
    }

    pub fn name(&self) -> &str {
        match self {
            DeclaredType::Boolean => "boolean",
            DeclaredType::Integer => "integer",
            DeclaredType::Double => "double",
            DeclaredType::String => "string",
            DeclaredType::Array => "array",
            DeclaredType::Class(name) => name,
        }
    }

    pub fn matches(
        &self,
        value: &AnnotationValue,
        registry: &dyn TypeRegistry,
    ) -> bool {
        match (self, value) {
            (DeclaredType::Boolean, AnnotationValue::Bool(_))
            | (DeclaredType::Integer, AnnotationValue::Int(_))
            | (DeclaredType::Double, AnnotationValue::Float(_))
            | (DeclaredType::String, AnnotationValue::String(_))
            | (DeclaredType::Array, AnnotationValue::Array(_)) => true,
            (DeclaredType::Class(name), AnnotationValue::Annotation(annot)) => {
                registry.is_instance(annot, name)
            },
            _ => false,
        }
    }
}

/// The declared type of an annotation field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldType {
    /// A single value of the given type.
    Single {
        declared: DeclaredType,
        /// The declaration exactly as written, for diagnostics.
        literal: String,
    },
    /// An array, optionally restricted to one element type
    /// (`array<string>`).
    Array { element: Option<DeclaredType> },
}

impl FieldType {
    /// Reads the first `@var <type>` declaration from a field's doc
    /// comment.
    ///
    /// Returns `None` when there is no declaration or it declares `mixed`.
    pub fn from_doc_comment(doc_comment: &str) -> Option<Self> {
        let literal = VAR_DECLARATION.captures(doc_comment)?.get(1)?.as_str();
        Self::parse(literal)
    }

    /// Parses a type literal such as `string`, `array<integer>` or
    /// `Acme\Route`.
    pub fn parse(literal: &str) -> Option<Self> {
        if let Some(open) = literal.find('<') {
            let element = literal[open + 1..].trim_end_matches('>');
            return Some(FieldType::Array {
                element: DeclaredType::from_name(element),
            });
        }
        match DeclaredType::from_name(literal)? {
            DeclaredType::Array => Some(FieldType::Array { element: None }),
            declared => Some(FieldType::Single {
                declared,
                literal: literal.to_string(),
            }),
        }
    }
}
