//! The external capability the engine consults to learn which types exist
//! and what they look like.

use crate::Annotation;
use crate::AnnotationValue;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Builds the final field map of an annotation type that takes all of its
/// values through a single initializer call.
///
/// Receives the grouped argument map (unnamed values under `value`) and
/// returns the fields to store on the [`Annotation`], or a reason the
/// values were rejected.
#[derive(Clone)]
pub struct Initializer(
    Arc<
        dyn Fn(
                &IndexMap<String, AnnotationValue>,
            ) -> Result<IndexMap<String, AnnotationValue>, String>
            + Send
            + Sync,
    >,
);

impl Initializer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(
                &IndexMap<String, AnnotationValue>,
            ) -> Result<IndexMap<String, AnnotationValue>, String>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(
        &self,
        values: &IndexMap<String, AnnotationValue>,
    ) -> Result<IndexMap<String, AnnotationValue>, String> {
        (self.0)(values)
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Initializer(..)")
    }
}

/// A publicly writable field of a described type.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: String,
    /// The field's own doc comment, searched for an `@var` declaration.
    pub doc_comment: Option<String>,
    /// Value the field holds when no argument assigns it.
    pub default: AnnotationValue,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_comment: None,
            default: AnnotationValue::Null,
        }
    }

    pub fn with_doc_comment(mut self, doc_comment: impl Into<String>) -> Self {
        self.doc_comment = Some(doc_comment.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<AnnotationValue>) -> Self {
        self.default = default.into();
        self
    }
}

/// What a [`TypeRegistry`] knows about one type.
#[derive(Clone, Debug, Default)]
pub struct TypeDescriptor {
    /// The type's declaration doc comment.
    pub doc_comment: String,
    /// Present if the type takes its values through an initializer rather
    /// than through its public fields.
    pub initializer: Option<Initializer>,
    /// Public fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Fully-qualified names of the types this type is a subtype of.
    pub parents: Vec<String>,
    /// Import aliases in effect in the type's own source (lower-case alias
    /// to fully-qualified name). Used when the type is a consumer.
    pub imports: IndexMap<String, String>,
}

impl TypeDescriptor {
    pub fn new(doc_comment: impl Into<String>) -> Self {
        Self {
            doc_comment: doc_comment.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_import(
        mut self,
        alias: impl AsRef<str>,
        name: impl Into<String>,
    ) -> Self {
        self.imports
            .insert(alias.as_ref().to_lowercase(), name.into());
        self
    }
}

/// Lookup capability for the types annotations can resolve to.
///
/// The engine never loads types itself: a type the registry does not know
/// is simply not resolvable.
pub trait TypeRegistry: Send + Sync {
    fn exists(&self, fully_qualified_name: &str) -> bool;

    fn describe(&self, fully_qualified_name: &str) -> Option<TypeDescriptor>;

    /// Returns `true` if `value` is an instance of `type_name`, either
    /// directly or through a chain of parents.
    fn is_instance(&self, value: &Annotation, type_name: &str) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![value.type_name().to_string()];
        while let Some(candidate) = pending.pop() {
            if candidate == type_name {
                return true;
            }
            if !seen.insert(candidate.clone()) {
                continue;
            }
            if let Some(descriptor) = self.describe(&candidate) {
                pending.extend(descriptor.parents);
            }
        }
        false
    }
}

/// A [`TypeRegistry`] backed by a map filled in up front.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl InMemoryTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a type.
    pub fn register(
        &mut self,
        fully_qualified_name: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> &mut Self {
        self.types.insert(fully_qualified_name.into(), descriptor);
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with_type(
        mut self,
        fully_qualified_name: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Self {
        self.register(fully_qualified_name, descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for InMemoryTypeRegistry {
    fn exists(&self, fully_qualified_name: &str) -> bool {
        self.types.contains_key(fully_qualified_name)
    }

    fn describe(&self, fully_qualified_name: &str) -> Option<TypeDescriptor> {
        self.types.get(fully_qualified_name).cloned()
    }
}
