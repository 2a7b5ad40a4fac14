use crate::AnnotationTypeMetadata;
use crate::ConsumerMetadata;
use crate::meta_annotations::MetaAnnotationKind;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

/// A lazily filled, never evicted map from type name to computed metadata.
///
/// Values are computed outside the lock. If two threads race to fill the
/// same key, both compute and the last insert wins; computation is
/// idempotent so either result is equally valid. A lock poisoned by a
/// panicking writer is recovered, since every write replaces one whole
/// entry.
#[derive(Debug)]
pub struct MetadataCache<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
}

pub type AnnotationMetadataCache = MetadataCache<AnnotationTypeMetadata>;
pub type ConsumerMetadataCache = MetadataCache<ConsumerMetadata>;

impl<V> MetadataCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), Arc::clone(&value));
        value
    }

    /// Returns the cached entry for `key`, computing and storing it first
    /// if absent. Errors from `compute` are returned and nothing is stored.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        log::trace!("metadata cache miss for `{key}`");
        Ok(self.insert(key, compute()?))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for MetadataCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache<AnnotationTypeMetadata> {
    /// A cache pre-seeded with the built-in meta-annotation types.
    pub fn with_meta_annotations() -> Self {
        let cache = Self::new();
        for kind in MetaAnnotationKind::ALL {
            cache.insert(kind.type_name(), kind.metadata());
        }
        cache
    }
}
