//! Core of the docblock annotation engine: the value model, type registry
//! seam, name resolution, metadata caches, the parser and the value
//! constructor.
//!
//! Most callers only need [`AnnotationEngine`], a [`TypeRegistry`]
//! implementation (such as [`InMemoryTypeRegistry`]) and [`ParseOptions`].

mod annotation;
mod annotation_engine;
mod annotation_type_metadata;
mod annotation_value;
mod config_error;
mod consumer_metadata;
mod doc_error_note;
mod doc_parse_error;
mod doc_parse_error_kind;
mod doc_parser;
mod field_type;
pub mod meta_annotations;
mod metadata_cache;
mod parse_options;
mod resolution_scope;
mod target;
mod type_registry;
mod value_constructor;

pub use annotation::Annotation;
pub use annotation_engine::AnnotationEngine;
pub use annotation_type_metadata::ANNOTATION_MARKER;
pub use annotation_type_metadata::AnnotationTypeMetadata;
pub use annotation_type_metadata::FieldMetadata;
pub use annotation_value::AnnotationArray;
pub use annotation_value::AnnotationValue;
pub use annotation_value::ArrayKey;
pub use config_error::ConfigError;
pub use consumer_metadata::ConsumerMetadata;
pub use doc_error_note::DocErrorNote;
pub use doc_error_note::DocErrorNoteKind;
pub use doc_error_note::DocErrorNotes;
pub use doc_parse_error::DocParseError;
pub use doc_parse_error_kind::DocParseErrorCategory;
pub use doc_parse_error_kind::DocParseErrorKind;
pub use field_type::DeclaredType;
pub use field_type::FieldType;
pub use meta_annotations::IgnoreAnnotation;
pub use meta_annotations::ImportAnnotation;
pub use meta_annotations::MetaAnnotationError;
pub use meta_annotations::TargetAnnotation;
pub use metadata_cache::AnnotationMetadataCache;
pub use metadata_cache::ConsumerMetadataCache;
pub use metadata_cache::MetadataCache;
pub use parse_options::ParseOptions;
pub use resolution_scope::ResolutionScope;
pub use target::TargetKind;
pub use target::Targets;
pub use target::UnknownTargetError;
pub use type_registry::FieldDescriptor;
pub use type_registry::InMemoryTypeRegistry;
pub use type_registry::Initializer;
pub use type_registry::TypeDescriptor;
pub use type_registry::TypeRegistry;

#[cfg(test)]
mod tests;
