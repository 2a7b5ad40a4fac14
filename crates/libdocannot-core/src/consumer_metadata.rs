use crate::ResolutionScope;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Resolution context harvested from a consumer type: the type whose doc
/// comments are being parsed.
///
/// Also caches raw annotation names already resolved while parsing that
/// type's comments.
#[derive(Debug)]
pub struct ConsumerMetadata {
    type_name: String,
    /// The consumer's own imports plus its namespace as a fallback.
    scope: ResolutionScope,
    /// Names listed by `@IgnoreAnnotation` on the consumer.
    ignored: HashSet<String>,
    resolved: RwLock<HashMap<String, String>>,
}

impl ConsumerMetadata {
    pub(crate) fn new(
        type_name: impl Into<String>,
        scope: ResolutionScope,
        ignored: HashSet<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            scope,
            ignored,
            resolved: RwLock::new(HashMap::new()),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn scope(&self) -> &ResolutionScope {
        &self.scope
    }

    pub fn ignored(&self) -> &HashSet<String> {
        &self.ignored
    }

    /// The fully-qualified name `raw_name` resolved to earlier, if any.
    pub fn resolved(&self, raw_name: &str) -> Option<String> {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(raw_name)
            .cloned()
    }

    pub(crate) fn remember(&self, raw_name: &str, fully_qualified_name: &str) {
        self.resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(raw_name.to_string(), fully_qualified_name.to_string());
    }

    /// Number of raw names resolved so far for this consumer.
    pub fn resolved_count(&self) -> usize {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Returns the namespace part of a fully-qualified type name.
pub(crate) fn namespace_of(type_name: &str) -> Option<&str> {
    type_name
        .rfind('\\')
        .map(|pos| &type_name[..pos])
        .filter(|ns| !ns.is_empty())
}
