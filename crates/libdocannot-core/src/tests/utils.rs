//! Shared fixtures: a small registry of annotation types under `Acme`, a
//! couple of consumer types under `App\Controller`, and shortcuts for
//! parsing against them.

use crate::Annotation;
use crate::AnnotationEngine;
use crate::AnnotationValue;
use crate::DocParseError;
use crate::FieldDescriptor;
use crate::InMemoryTypeRegistry;
use crate::Initializer;
use crate::ParseOptions;
use crate::TargetKind;
use crate::TypeDescriptor;
use std::sync::Arc;

pub(super) const LABEL: &str = "method HomeController::index()";

pub(super) fn typed_field(name: &str, var: &str) -> FieldDescriptor {
    FieldDescriptor::new(name).with_doc_comment(format!("/** @var {var} */"))
}

pub(super) fn annotation_type(doc_comment: &str) -> TypeDescriptor {
    TypeDescriptor::new(doc_comment)
}

pub(super) fn fixture_registry() -> InMemoryTypeRegistry {
    let mut registry = InMemoryTypeRegistry::new();
    registry
        .register(
            "Acme\\Route",
            annotation_type(
                "/**\n * @Annotation\n * @Target({\"METHOD\", \"CLASS\"})\n */",
            )
            .with_field(typed_field("path", "string"))
            .with_field(typed_field("methods", "array<string>"))
            .with_field(typed_field("name", "string")),
        )
        .register(
            "Acme\\Name",
            annotation_type("/** @Annotation */").with_field(FieldDescriptor::new("value")),
        )
        .register(
            "Acme\\SubName",
            annotation_type("/** @Annotation */")
                .with_field(FieldDescriptor::new("value"))
                .with_parent("Acme\\Name"),
        )
        .register("Acme\\Marker", annotation_type("/** @Annotation */"))
        .register(
            "Acme\\Typed",
            annotation_type("/** @Annotation */")
                .with_field(typed_field("value", "mixed"))
                .with_field(typed_field("flag", "bool"))
                .with_field(typed_field("count", "integer"))
                .with_field(typed_field("ratio", "float"))
                .with_field(typed_field("label", "string"))
                .with_field(typed_field("list", "array"))
                .with_field(typed_field("names", "array<string>"))
                .with_field(typed_field("child", "Acme\\Name"))
                .with_field(typed_field("children", "array<Acme\\Name>"))
                .with_field(FieldDescriptor::new("limit").with_default(10i64)),
        )
        .register("Acme\\Entity", annotation_type("/** A plain model type. */"))
        .register(
            "Acme\\Factory",
            annotation_type("/** @Annotation */").with_initializer(Initializer::new(
                |values| {
                    if values.contains_key("fail") {
                        return Err("refusing to build".to_string());
                    }
                    let mut fields = values.clone();
                    fields.insert("built".to_string(), AnnotationValue::Bool(true));
                    Ok(fields)
                },
            )),
        )
        .register(
            "Acme\\ClassOnly",
            annotation_type("/** @Annotation @Target(\"CLASS\") */")
                .with_field(FieldDescriptor::new("value")),
        )
        .register(
            "Acme\\PropertyOnly",
            annotation_type("/** @Annotation @Target(\"PROPERTY\") */")
                .with_field(FieldDescriptor::new("value")),
        )
        .register(
            "Acme\\AnnotationOnly",
            annotation_type("/** @Annotation @Target(\"ANNOTATION\") */")
                .with_field(FieldDescriptor::new("value")),
        )
        .register(
            "Acme\\BadTarget",
            annotation_type("/** @Annotation @Target(\"NOWHERE\") */"),
        )
        .register(
            "Acme\\Routing\\Get",
            annotation_type("/** @Annotation */").with_field(FieldDescriptor::new("path")),
        )
        .register(
            "Doctrine\\ORM\\Mapping\\Column",
            annotation_type("/** @Annotation */").with_field(typed_field("type", "string")),
        )
        .register(
            "App\\Controller\\Cache",
            annotation_type("/** @Annotation */").with_field(FieldDescriptor::new("ttl")),
        )
        .register(
            "App\\Controller\\HomeController",
            TypeDescriptor::new(
                r#"/**
                 * Serves the landing page.
                 *
                 * @Import(alias="orm", name="Doctrine\ORM\Mapping")
                 * @IgnoreAnnotation({"todo", "fixme"})
                 */"#,
            )
            .with_import("Acme", "Acme"),
        )
        .register(
            "App\\Controller\\PlainController",
            TypeDescriptor::new("/** No directives here. */"),
        );
    registry
}

pub(super) fn engine() -> AnnotationEngine {
    AnnotationEngine::new(Arc::new(fixture_registry()))
}

/// Options resolving unqualified names against `Acme`.
pub(super) fn acme_options(target: TargetKind) -> ParseOptions {
    ParseOptions::new(target)
        .with_namespace("Acme")
        .expect("no imports configured")
}

/// Parses `text` on a method with the `Acme` namespace in scope.
pub(super) fn parse(text: &str) -> Result<Vec<Annotation>, DocParseError> {
    engine().parse(text, LABEL, &acme_options(TargetKind::Method))
}

/// Parses `text`, expecting exactly one annotation.
pub(super) fn parse_one(text: &str) -> Annotation {
    let mut annotations = parse(text).expect("parse failed");
    assert_eq!(annotations.len(), 1, "expected one annotation in {text:?}");
    annotations.remove(0)
}

pub(super) fn parse_err(text: &str) -> DocParseError {
    parse(text).expect_err("parse unexpectedly succeeded")
}
