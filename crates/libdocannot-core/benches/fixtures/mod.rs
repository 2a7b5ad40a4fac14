use libdocannot_core::AnnotationEngine;
use libdocannot_core::FieldDescriptor;
use libdocannot_core::InMemoryTypeRegistry;
use libdocannot_core::ParseOptions;
use libdocannot_core::TargetKind;
use libdocannot_core::TypeDescriptor;
use std::sync::Arc;

pub const LABEL: &str = "method BenchController::action()";

pub const SMALL_DOCBLOCK: &str = r#"/**
 * Lists every order.
 *
 * @Route("/orders", name="orders")
 */"#;

pub const MEDIUM_DOCBLOCK: &str = r#"/**
 * Updates a single order.
 *
 * @param int $id
 * @Route("/orders/{id}", name="order_update", methods={"PUT", "PATCH"})
 * @Security(roles={"ROLE_ADMIN", "ROLE_SUPPORT"}, strict=true)
 * @Cache(ttl=3600, public=false, vary={"Accept", "Authorization"})
 * @Deprecated
 */"#;

pub const NESTED_DOCBLOCK: &str = r#"/**
 * @Table(name="orders", indexes={
 *     @Index(name="by_customer", columns={"customer_id", "created_at"}),
 *     @Index(name="by_status", columns={"status"}),
 *     @Index(name="by_total", columns={"total"})
 * }, options={"engine"="InnoDB", "charset"="utf8mb4", "collate"="utf8mb4_unicode_ci"})
 */"#;

pub const PROSE_DOCBLOCK: &str = r#"/**
 * A long explanation of how orders move through the fulfillment pipeline,
 * including edge cases (partial refunds, split shipments, backorders) that
 * mention addresses like billing@example.com but carry no annotations at
 * all. The parser should skip all of this quickly.
 */"#;

/// A docblock with `count` copies of the medium annotations.
pub fn repeated_docblock(count: usize) -> String {
    let mut text = String::from("/**\n");
    for idx in 0..count {
        text.push_str(&format!(
            " * @Route(\"/orders/{idx}\", name=\"order_{idx}\", methods={{\"GET\"}})\n",
        ));
        text.push_str(" * @Cache(ttl=60, vary={\"Accept\"})\n");
    }
    text.push_str(" */");
    text
}

fn typed(name: &str, var: &str) -> FieldDescriptor {
    FieldDescriptor::new(name).with_doc_comment(format!("/** @var {var} */"))
}

pub fn registry() -> InMemoryTypeRegistry {
    InMemoryTypeRegistry::new()
        .with_type(
            "Bench\\Route",
            TypeDescriptor::new("/** @Annotation @Target({\"METHOD\", \"CLASS\"}) */")
                .with_field(typed("path", "string"))
                .with_field(typed("name", "string"))
                .with_field(typed("methods", "array<string>")),
        )
        .with_type(
            "Bench\\Security",
            TypeDescriptor::new("/** @Annotation */")
                .with_field(typed("roles", "array<string>"))
                .with_field(typed("strict", "bool")),
        )
        .with_type(
            "Bench\\Cache",
            TypeDescriptor::new("/** @Annotation */")
                .with_field(typed("ttl", "integer"))
                .with_field(typed("public", "bool"))
                .with_field(typed("vary", "array")),
        )
        .with_type("Bench\\Deprecated", TypeDescriptor::new("/** @Annotation */"))
        .with_type(
            "Bench\\Table",
            TypeDescriptor::new("/** @Annotation @Target(\"CLASS\") */")
                .with_field(typed("name", "string"))
                .with_field(typed("indexes", "array<Bench\\Index>"))
                .with_field(typed("options", "array")),
        )
        .with_type(
            "Bench\\Index",
            TypeDescriptor::new("/** @Annotation @Target(\"ANNOTATION\") */")
                .with_field(typed("name", "string"))
                .with_field(typed("columns", "array<string>")),
        )
}

pub fn engine() -> AnnotationEngine {
    AnnotationEngine::new(Arc::new(registry()))
}

pub fn options(target: TargetKind) -> ParseOptions {
    ParseOptions::new(target)
        .with_namespace("Bench")
        .expect("no imports configured")
        .with_ignore_unimported(true)
}
