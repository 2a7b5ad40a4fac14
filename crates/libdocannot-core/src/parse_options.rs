use crate::ConfigError;
use crate::ResolutionScope;
use crate::TargetKind;
use indexmap::IndexMap;
use std::collections::HashSet;

type Result<T> = std::result::Result<T, ConfigError>;

/// Per-call configuration for [`AnnotationEngine::parse`].
///
/// Build with the consuming `with_*` methods:
///
/// ```
/// use libdocannot_core::ParseOptions;
/// use libdocannot_core::TargetKind;
///
/// # fn example() -> Result<(), libdocannot_core::ConfigError> {
/// let options = ParseOptions::new(TargetKind::Property)
///     .with_namespace("Acme\\Annotations")?
///     .with_ignored_name("author");
/// assert!(options.with_import("orm", "Doctrine\\ORM\\Mapping").is_err());
/// # Ok(())
/// # }
/// ```
///
/// [`AnnotationEngine::parse`]: crate::AnnotationEngine::parse
#[derive(Clone, Debug)]
pub struct ParseOptions {
    scope: ResolutionScope,
    ignored_names: HashSet<String>,
    ignore_unimported: bool,
    target: TargetKind,
    consumer_type: Option<String>,
}

impl ParseOptions {
    pub fn new(target: TargetKind) -> Self {
        Self {
            scope: ResolutionScope::new(),
            ignored_names: HashSet::new(),
            ignore_unimported: false,
            target,
            consumer_type: None,
        }
    }

    /// Adds import aliases. Aliases are matched case-insensitively.
    ///
    /// Fails if fallback namespaces were already configured.
    pub fn with_imports<I, A, N>(mut self, imports: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, N)>,
        A: AsRef<str>,
        N: Into<String>,
    {
        if !self.scope.namespaces.is_empty() {
            return Err(ConfigError::ImportsWithNamespaces);
        }
        for (alias, name) in imports {
            self.scope
                .imports
                .insert(alias.as_ref().to_lowercase(), name.into());
        }
        Ok(self)
    }

    /// Adds a single import alias. See [`with_imports`](Self::with_imports).
    pub fn with_import(
        self,
        alias: impl AsRef<str>,
        name: impl Into<String>,
    ) -> Result<Self> {
        self.with_imports([(alias, name)])
    }

    /// Appends a fallback namespace to probe for unqualified names.
    ///
    /// Fails if imports were already configured.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Result<Self> {
        if !self.scope.imports.is_empty() {
            return Err(ConfigError::ImportsWithNamespaces);
        }
        let namespace = namespace.into();
        let namespace = namespace.trim_matches('\\').to_string();
        if !self.scope.namespaces.contains(&namespace) {
            self.scope.namespaces.push(namespace);
        }
        Ok(self)
    }

    /// Adds a raw annotation name (as written after `@`) to skip silently.
    pub fn with_ignored_name(mut self, name: impl Into<String>) -> Self {
        self.ignored_names.insert(name.into());
        self
    }

    pub fn with_ignored_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// When set, names that fail to resolve are dropped instead of failing
    /// the parse.
    pub fn with_ignore_unimported(mut self, ignore: bool) -> Self {
        self.ignore_unimported = ignore;
        self
    }

    pub fn with_target(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    /// Names the type whose doc comment is being parsed. Enables the
    /// per-consumer resolution cache and the consumer's own directives.
    pub fn with_consumer_type(mut self, consumer_type: impl Into<String>) -> Self {
        let consumer_type = consumer_type.into();
        self.consumer_type =
            Some(consumer_type.trim_start_matches('\\').to_string());
        self
    }

    pub fn scope(&self) -> &ResolutionScope {
        &self.scope
    }

    pub fn imports(&self) -> &IndexMap<String, String> {
        &self.scope.imports
    }

    pub fn namespaces(&self) -> &[String] {
        &self.scope.namespaces
    }

    pub fn ignored_names(&self) -> &HashSet<String> {
        &self.ignored_names
    }

    pub fn ignore_unimported(&self) -> bool {
        self.ignore_unimported
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    pub fn consumer_type(&self) -> Option<&str> {
        self.consumer_type.as_deref()
    }
}
