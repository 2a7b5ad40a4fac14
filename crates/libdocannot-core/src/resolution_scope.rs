use indexmap::IndexMap;

/// The alias and namespace context used to turn an annotation name into a
/// fully-qualified type name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolutionScope {
    /// Lower-case alias to fully-qualified name.
    pub imports: IndexMap<String, String>,
    /// Fallback namespaces, probed in order.
    pub namespaces: Vec<String>,
}

impl ResolutionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a raw annotation name as written after the `@`.
    ///
    /// - A leading `\` marks the name as fully qualified; it is returned
    ///   without the leading separator.
    /// - A name that already exists is returned unchanged.
    /// - Otherwise the first `\`-separated segment is looked up (lower-cased)
    ///   in the imports and the rest of the name is appended to the import
    ///   target. Without a matching import, each namespace is probed in order
    ///   for `namespace\name`.
    ///
    /// An import match is returned without checking that the target exists;
    /// the caller reports that separately.
    pub fn resolve(
        &self,
        raw_name: &str,
        exists: impl Fn(&str) -> bool,
    ) -> Option<String> {
        if let Some(qualified) = raw_name.strip_prefix('\\') {
            return Some(qualified.to_string());
        }
        if exists(raw_name) {
            return Some(raw_name.to_string());
        }

        let (alias, remainder) = match raw_name.find('\\') {
            Some(pos) => (&raw_name[..pos], &raw_name[pos..]),
            None => (raw_name, ""),
        };
        if let Some(target) = self.imports.get(&alias.to_lowercase()) {
            return Some(format!("{target}{remainder}"));
        }

        self.namespaces
            .iter()
            .map(|namespace| format!("{namespace}\\{raw_name}"))
            .find(|candidate| exists(candidate))
    }

    /// Returns a scope with `other`'s imports layered over this one's and
    /// `other`'s namespaces probed first.
    pub(crate) fn layered_under(&self, other: &ResolutionScope) -> ResolutionScope {
        let mut imports = self.imports.clone();
        for (alias, target) in &other.imports {
            imports.insert(alias.clone(), target.clone());
        }
        let mut namespaces = other.namespaces.clone();
        for namespace in &self.namespaces {
            if !namespaces.contains(namespace) {
                namespaces.push(namespace.clone());
            }
        }
        ResolutionScope {
            imports,
            namespaces,
        }
    }
}
