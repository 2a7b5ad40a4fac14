use crate::AnnotationEngine;
use crate::AnnotationValue;
use crate::DeclaredType;
use crate::DocErrorNoteKind;
use crate::DocParseError;
use crate::DocParseErrorKind;
use crate::FieldType;
use crate::ParseOptions;
use crate::TargetKind;
use crate::Targets;
use crate::tests::utils::LABEL;
use crate::tests::utils::acme_options;
use crate::tests::utils::engine;
use crate::tests::utils::parse_err;
use crate::tests::utils::parse_one;

type Result<T> = std::result::Result<T, DocParseError>;

const HOME_CONTROLLER: &str = "App\\Controller\\HomeController";

fn consumer_options() -> ParseOptions {
    ParseOptions::new(TargetKind::Method).with_consumer_type(HOME_CONTROLLER)
}

mod resolution {
    use super::*;

    #[test]
    fn leading_separator_is_fully_qualified() -> Result<()> {
        let annotations = engine().parse(
            "/** @\\Acme\\Name(\"x\") */",
            LABEL,
            &ParseOptions::new(TargetKind::Method),
        )?;
        assert_eq!(annotations[0].type_name(), "Acme\\Name");
        Ok(())
    }

    #[test]
    fn known_qualified_name_needs_no_scope() -> Result<()> {
        let annotations = engine().parse(
            "/** @Acme\\Marker */",
            LABEL,
            &ParseOptions::new(TargetKind::Method),
        )?;
        assert_eq!(annotations[0].type_name(), "Acme\\Marker");
        Ok(())
    }

    #[test]
    fn import_alias_is_case_insensitive_and_keeps_the_remainder() -> Result<()> {
        let options = ParseOptions::new(TargetKind::Method)
            .with_import("Routing", "Acme\\Routing")
            .expect("no namespaces configured");
        let annotations = engine().parse(
            "/** @routing\\Get(\"/a\") @ROUTING\\Get(\"/b\") */",
            LABEL,
            &options,
        )?;
        assert_eq!(annotations.len(), 2);
        assert!(annotations.iter().all(|a| a.type_name() == "Acme\\Routing\\Get"));
        Ok(())
    }

    #[test]
    fn different_raw_names_through_different_namespaces_agree() -> Result<()> {
        let options = acme_options(TargetKind::Method)
            .with_namespace("Acme\\Routing")
            .expect("no imports configured");
        let annotations = engine().parse(
            "/** @Routing\\Get(\"/\") @Get(\"/\") */",
            LABEL,
            &options,
        )?;
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].type_name(), "Acme\\Routing\\Get");
        assert_eq!(annotations[0], annotations[1]);
        Ok(())
    }

    #[test]
    fn resolve_without_parsing() -> Result<()> {
        let engine = engine();
        let options = acme_options(TargetKind::Method);
        assert_eq!(engine.resolve("Route", &options)?, Some("Acme\\Route".to_string()));
        assert_eq!(engine.resolve("\\Nowhere\\Thing", &options)?, Some("Nowhere\\Thing".to_string()));
        assert_eq!(engine.resolve("Nowhere", &options)?, None);
        Ok(())
    }
}

mod ignore_policies {
    use super::*;

    #[test]
    fn unresolved_name_fails_by_default() {
        let err = parse_err("/** @Unknown */");
        assert!(err.is_semantic());
        assert_eq!(err.kind(), &DocParseErrorKind::NotImported {
            name: "Unknown".to_string(),
        });
        assert_eq!(
            err.message(),
            "The annotation \"@Unknown\" in method HomeController::index() was never imported.",
        );
        assert_eq!(err.notes().len(), 1);
        assert_eq!(err.notes()[0].kind, DocErrorNoteKind::Help);
    }

    #[test]
    fn ignored_name_is_dropped() -> Result<()> {
        let options = acme_options(TargetKind::Method).with_ignored_name("Unknown");
        let annotations = engine().parse("/** @Unknown @Name(\"x\") */", LABEL, &options)?;
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].type_name(), "Acme\\Name");
        Ok(())
    }

    #[test]
    fn ignore_unimported_drops_every_unresolved_name() -> Result<()> {
        let options = acme_options(TargetKind::Method).with_ignore_unimported(true);
        let annotations = engine().parse(
            "/**\n * @param int $id\n * @return void\n * @Name(\"x\")\n */",
            LABEL,
            &options,
        )?;
        assert_eq!(annotations.len(), 1);
        Ok(())
    }

    #[test]
    fn dropped_top_level_annotation_leaves_its_arguments_as_prose() -> Result<()> {
        let options = acme_options(TargetKind::Method).with_ignored_name("see");
        let annotations = engine().parse(
            "/** @see(the docs, then @Name(\"x\")) */",
            LABEL,
            &options,
        )?;
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].get("value"), Some(&AnnotationValue::from("x")));
        Ok(())
    }

    #[test]
    fn dropped_nested_annotation_consumes_its_arguments() -> Result<()> {
        let options = acme_options(TargetKind::Method).with_ignored_name("Skip");
        let annotations = engine().parse(
            "/** @Name({@Skip(1, {2}, @Skip(3)), \"kept\"}) */",
            LABEL,
            &options,
        )?;
        let kept: crate::AnnotationArray = ["kept"].into_iter().collect();
        assert_eq!(annotations[0].get("value"), Some(&AnnotationValue::Array(kept)));
        Ok(())
    }

    #[test]
    fn dropped_nested_value_leaves_the_field_unset() -> Result<()> {
        let options = acme_options(TargetKind::Method).with_ignored_name("Skip");
        let annotations = engine().parse("/** @Name(@Skip) */", LABEL, &options)?;
        assert_eq!(annotations[0].get("value"), Some(&AnnotationValue::Null));
        Ok(())
    }

    #[test]
    fn ignore_list_also_covers_non_annotation_types() -> Result<()> {
        let options = acme_options(TargetKind::Method).with_ignored_name("Entity");
        assert!(engine().parse("/** @Entity */", LABEL, &options)?.is_empty());
        Ok(())
    }
}

mod semantic_errors {
    use super::*;

    #[test]
    fn import_of_a_missing_type() {
        let options = ParseOptions::new(TargetKind::Method)
            .with_import("gone", "Acme\\Gone")
            .expect("no namespaces configured");
        let err = engine()
            .parse("/** @gone */", LABEL, &options)
            .expect_err("Acme\\Gone is not registered");
        assert_eq!(err.kind(), &DocParseErrorKind::TypeNotFound {
            name: "Acme\\Gone".to_string(),
        });
    }

    #[test]
    fn type_without_annotation_marker() {
        let err = parse_err("/** @Entity */");
        assert_eq!(err.kind(), &DocParseErrorKind::NotAnAnnotation {
            name: "Acme\\Entity".to_string(),
        });
        assert!(err.message().contains("\"Acme\\Entity\" is not annotated with @Annotation"));
        assert!(err.message().contains("\"@Entity\" in method HomeController::index()"));
        assert_eq!(err.notes().len(), 2);
    }

    #[test]
    fn target_mismatch_lists_allowed_targets() {
        let err = parse_err("/** @PropertyOnly(\"x\") */");
        assert_eq!(err.kind(), &DocParseErrorKind::TargetNotAllowed {
            name: "PropertyOnly".to_string(),
            target: "METHOD".to_string(),
            allowed: "PROPERTY".to_string(),
        });
        assert_eq!(
            err.message(),
            "Annotation @PropertyOnly is not allowed to be declared on method \
             HomeController::index(). You may only use this annotation on these \
             code elements: PROPERTY.",
        );
    }

    #[test]
    fn class_only_annotation_on_a_property() {
        let err = engine()
            .parse(
                "/** @ClassOnly */",
                "property User::$name",
                &acme_options(TargetKind::Property),
            )
            .expect_err("CLASS only");
        assert!(matches!(
            err.kind(),
            DocParseErrorKind::TargetNotAllowed { allowed, .. } if allowed == "CLASS"
        ));
    }

    #[test]
    fn multi_target_literal_keeps_declaration_order() {
        let err = engine()
            .parse("/** @Route */", "property User::$name", &acme_options(TargetKind::Property))
            .expect_err("not allowed on properties");
        assert!(err.message().ends_with("code elements: METHOD, CLASS."));
    }

    #[test]
    fn invalid_target_declaration_on_the_type() {
        let err = parse_err("/** @BadTarget */");
        assert!(matches!(
            err.kind(),
            DocParseErrorKind::InvalidMetaAnnotation { name, .. } if name == "Target"
        ));
        assert_eq!(
            err.message(),
            "Invalid @Target declared on class Acme\\BadTarget: Invalid target \
             \"NOWHERE\". Available targets: [ALL, CLASS, METHOD, PROPERTY, ANNOTATION]",
        );
    }

    #[test]
    fn meta_annotation_outside_a_type_comment() {
        let err = parse_err("/** @Docannot\\Meta\\Target(\"CLASS\") */");
        assert!(matches!(err.kind(), DocParseErrorKind::TargetNotAllowed { .. }));
    }

    #[test]
    fn initializer_rejection() {
        let err = parse_err("/** @Factory(fail=true) */");
        assert_eq!(err.kind(), &DocParseErrorKind::CreationFailed {
            name: "Factory".to_string(),
            reason: "refusing to build".to_string(),
        });
    }

    #[test]
    fn initializer_receives_grouped_values() {
        let factory = parse_one("/** @Factory(\"x\", extra=1) */");
        let fields: Vec<(&str, &AnnotationValue)> = factory
            .fields()
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        assert_eq!(fields, vec![
            ("value", &AnnotationValue::from("x")),
            ("extra", &AnnotationValue::Int(1)),
            ("built", &AnnotationValue::Bool(true)),
        ]);
    }
}

mod nested_targets {
    use super::*;

    #[test]
    fn nested_annotation_is_checked_against_annotation_target() -> Result<()> {
        let options = acme_options(TargetKind::Class);
        let annotations =
            engine().parse("/** @Name(@AnnotationOnly(\"v\")) */", "class Page", &options)?;
        let Some(AnnotationValue::Annotation(inner)) = annotations[0].get("value") else {
            panic!("expected a nested annotation");
        };
        assert_eq!(inner.type_name(), "Acme\\AnnotationOnly");
        Ok(())
    }

    #[test]
    fn annotation_only_type_is_rejected_at_top_level() {
        let err = engine()
            .parse("/** @AnnotationOnly(\"v\") */", "class Page", &acme_options(TargetKind::Class))
            .expect_err("top-level use");
        assert!(matches!(
            err.kind(),
            DocParseErrorKind::TargetNotAllowed { target, .. } if target == "CLASS"
        ));
    }

    #[test]
    fn outer_target_does_not_leak_into_nested_annotations() {
        let err = engine()
            .parse("/** @Name(@ClassOnly(\"v\")) */", "class Page", &acme_options(TargetKind::Class))
            .expect_err("nested use of a CLASS-only annotation");
        assert!(matches!(
            err.kind(),
            DocParseErrorKind::TargetNotAllowed { name, target, .. }
                if name == "ClassOnly" && target == "ANNOTATION"
        ));
    }

    #[test]
    fn each_top_level_annotation_starts_unnested() -> Result<()> {
        let annotations = engine().parse(
            "/** @Name(@Marker) @ClassOnly(\"v\") */",
            "class Page",
            &acme_options(TargetKind::Class),
        )?;
        assert_eq!(annotations.len(), 2);
        Ok(())
    }
}

mod consumers {
    use super::*;

    #[test]
    fn import_directive_on_the_consumer() -> Result<()> {
        let annotations = engine().parse(
            "/** @orm\\Column(type=\"string\") */",
            LABEL,
            &consumer_options(),
        )?;
        assert_eq!(annotations[0].type_name(), "Doctrine\\ORM\\Mapping\\Column");
        Ok(())
    }

    #[test]
    fn descriptor_imports_and_own_namespace() -> Result<()> {
        let annotations = engine().parse(
            "/** @acme\\Name(\"x\") @Cache(ttl=60) */",
            LABEL,
            &consumer_options(),
        )?;
        let names: Vec<&str> = annotations.iter().map(|a| a.type_name()).collect();
        assert_eq!(names, vec!["Acme\\Name", "App\\Controller\\Cache"]);
        Ok(())
    }

    #[test]
    fn ignore_directive_on_the_consumer() -> Result<()> {
        let annotations = engine().parse(
            "/**\n * @todo tidy up\n * @fixme later\n * @Cache(ttl=1)\n */",
            LABEL,
            &consumer_options(),
        )?;
        assert_eq!(annotations.len(), 1);
        Ok(())
    }

    #[test]
    fn unlisted_name_still_fails_for_a_consumer() {
        let err = engine()
            .parse("/** @Name */", LABEL, &consumer_options())
            .expect_err("Name is not in the consumer's scope");
        assert!(matches!(err.kind(), DocParseErrorKind::NotImported { .. }));
    }

    #[test]
    fn options_scope_is_layered_over_the_consumer() -> Result<()> {
        let options = acme_options(TargetKind::Method)
            .with_consumer_type(HOME_CONTROLLER)
            .with_ignored_name("internal");
        let annotations = engine().parse(
            "/** @Name(\"x\") @Cache(ttl=1) @internal @todo */",
            LABEL,
            &options,
        )?;
        let names: Vec<&str> = annotations.iter().map(|a| a.type_name()).collect();
        assert_eq!(names, vec!["Acme\\Name", "App\\Controller\\Cache"]);
        Ok(())
    }

    #[test]
    fn resolved_names_are_cached_per_consumer() -> Result<()> {
        let engine = engine();
        engine.parse("/** @Cache @Cache @orm\\Column @todo */", LABEL, &consumer_options())?;

        let consumer = engine
            .consumer_metadata()
            .get(HOME_CONTROLLER)
            .expect("consumer metadata is cached");
        assert_eq!(consumer.resolved_count(), 2);
        assert_eq!(consumer.resolved("Cache").as_deref(), Some("App\\Controller\\Cache"));
        assert_eq!(consumer.resolved("todo"), None);
        assert!(consumer.ignored().contains("fixme"));
        assert_eq!(consumer.scope().namespaces, vec!["App\\Controller".to_string()]);
        Ok(())
    }

    #[test]
    fn resolve_and_parse_share_the_consumer_cache() -> Result<()> {
        let engine = engine();
        let options = consumer_options();
        assert_eq!(
            engine.resolve("Cache", &options)?.as_deref(),
            Some("App\\Controller\\Cache"),
        );
        assert_eq!(engine.resolve("todo", &options)?, None);

        let consumer = engine
            .consumer_metadata()
            .get(HOME_CONTROLLER)
            .expect("consumer metadata is cached");
        assert_eq!(consumer.resolved_count(), 1);

        // Parsing reuses the entry `resolve` left behind.
        engine.parse("/** @Cache(ttl=1) */", LABEL, &options)?;
        assert_eq!(consumer.resolved_count(), 1);
        Ok(())
    }

    #[test]
    fn consumer_metadata_is_computed_once() -> Result<()> {
        let engine = engine();
        engine.parse("/** @Cache */", LABEL, &consumer_options())?;
        let qualified = consumer_options().with_consumer_type("\\App\\Controller\\HomeController");
        engine.parse("/** @Cache */", LABEL, &qualified)?;
        assert_eq!(engine.consumer_metadata().len(), 1);
        Ok(())
    }

    #[test]
    fn consumer_without_directives() -> Result<()> {
        let options = ParseOptions::new(TargetKind::Method)
            .with_consumer_type("App\\Controller\\PlainController");
        let annotations = engine().parse("/** @Cache(ttl=5) */", LABEL, &options)?;
        assert_eq!(annotations[0].type_name(), "App\\Controller\\Cache");
        Ok(())
    }

    #[test]
    fn unknown_consumer_type() {
        let options = ParseOptions::new(TargetKind::Method).with_consumer_type("App\\Missing");
        let err = engine()
            .parse("/** @Cache */", LABEL, &options)
            .expect_err("consumer is not registered");
        assert!(matches!(err.kind(), DocParseErrorKind::TypeNotFound { name } if name == "App\\Missing"));
        assert!(err.message().contains("class App\\Missing"));
    }
}

mod metadata {
    use super::*;

    #[test]
    fn engine_starts_with_meta_annotations_only() {
        let engine = engine();
        assert_eq!(engine.annotation_metadata().len(), 3);
        assert!(engine.consumer_metadata().is_empty());
    }

    #[test]
    fn parsing_fills_the_annotation_cache() -> Result<()> {
        let engine = engine();
        engine.parse("/** @Route @Name(@Marker) */", LABEL, &acme_options(TargetKind::Method))?;
        assert_eq!(engine.annotation_metadata().len(), 6);
        assert!(engine.annotation_metadata().contains("Acme\\Route"));
        Ok(())
    }

    #[test]
    fn failed_metadata_is_not_cached() {
        let engine = engine();
        let options = acme_options(TargetKind::Method);
        for _ in 0..2 {
            let err = engine.parse("/** @BadTarget */", LABEL, &options).expect_err("invalid @Target");
            assert!(matches!(err.kind(), DocParseErrorKind::InvalidMetaAnnotation { .. }));
        }
        assert!(!engine.annotation_metadata().contains("Acme\\BadTarget"));
    }

    #[test]
    fn route_metadata() -> Result<()> {
        let metadata = engine().metadata_for("Acme\\Route")?;
        assert!(metadata.is_annotation());
        assert!(!metadata.has_constructor());
        assert_eq!(
            metadata.targets(),
            [TargetKind::Method, TargetKind::Class].into_iter().collect::<Targets>(),
        );
        assert_eq!(metadata.targets_literal(), "METHOD, CLASS");
        assert_eq!(metadata.default_field(), Some("path"));
        assert_eq!(
            metadata.field_type("methods"),
            Some(&FieldType::Array { element: Some(DeclaredType::String) }),
        );
        Ok(())
    }

    #[test]
    fn initializer_metadata_has_no_fields() -> Result<()> {
        let metadata = engine().metadata_for("Acme\\Factory")?;
        assert!(metadata.has_constructor());
        assert!(metadata.fields().is_empty());
        assert_eq!(metadata.default_field(), None);
        Ok(())
    }

    #[test]
    fn plain_type_metadata() -> Result<()> {
        let metadata = engine().metadata_for("Acme\\Entity")?;
        assert!(!metadata.is_annotation());
        assert_eq!(metadata.targets(), Targets::ALL);
        assert_eq!(metadata.targets_literal(), "ALL");
        Ok(())
    }

    #[test]
    fn unregistered_type_metadata() {
        let err = engine().metadata_for("Acme\\Gone").expect_err("not registered");
        assert!(matches!(err.kind(), DocParseErrorKind::TypeNotFound { .. }));
    }

    #[test]
    fn engines_do_not_share_caches() -> Result<()> {
        let first = engine();
        let second = engine();
        first.parse("/** @Route */", LABEL, &acme_options(TargetKind::Method))?;
        assert!(first.annotation_metadata().contains("Acme\\Route"));
        assert!(!second.annotation_metadata().contains("Acme\\Route"));
        Ok(())
    }
}

mod concurrency {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_is_send_and_sync() {
        assert_send_sync::<AnnotationEngine>();
    }

    #[test]
    fn parallel_parses_share_one_engine() -> Result<()> {
        let engine = engine();
        let options = acme_options(TargetKind::Method).with_consumer_type(HOME_CONTROLLER);
        let text = "/** @Route(\"/x\", methods={\"GET\"}) @Name({@Marker, @orm\\Column(type=\"int\")}) */";
        let expected = engine.parse(text, LABEL, &options)?;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| engine.parse(text, LABEL, &options)))
                .collect();
            for handle in handles {
                let parsed = handle.join().expect("parser thread panicked");
                assert_eq!(parsed.as_ref().ok(), Some(&expected));
            }
        });
        Ok(())
    }

    #[test]
    fn cold_caches_fill_consistently_across_threads() {
        let engine = engine();
        let options = acme_options(TargetKind::Method);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let annotations = engine
                        .parse("/** @Route @Typed(count=1) */", LABEL, &options)
                        .expect("parse succeeds");
                    assert_eq!(annotations.len(), 2);
                });
            }
        });
        assert!(engine.annotation_metadata().contains("Acme\\Typed"));
    }
}
