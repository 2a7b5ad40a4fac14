/// A [`ParseOptions`](crate::ParseOptions) combination that cannot be used.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Imports and fallback namespaces are mutually exclusive: use either \
         with_imports() or with_namespace(), but not both."
    )]
    ImportsWithNamespaces,
}
