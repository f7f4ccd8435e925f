//! Process-local cache backend over a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::cache::{CacheError, PermissionCacheEvictor};

/// In-process permission cache.
///
/// Values are opaque serialized permission sets. This module only ever
/// removes entries; readers elsewhere populate them on demand.
#[derive(Debug, Default)]
pub struct InMemoryPermissionCache {
    entries: DashMap<String, String>,
}

impl InMemoryPermissionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a serialized value under `key`.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Fetch the serialized value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PermissionCacheEvictor for InMemoryPermissionCache {
    async fn evict(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key).is_some())
    }
}
