//! Per-user permission cache eviction.
//!
//! This module never populates the cache: the authorization layer computes
//! and stores per-user permission sets under `permissions:{user_id}` and
//! must tolerate a missing entry at any time. Eviction is the only write
//! performed here, and it runs strictly after the grant transaction has
//! committed.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Key template for cached per-user permission sets.
pub const USER_PERMISSIONS_KEY: &str = "permissions:{user_id}";

/// Cache key holding a user's computed permission set.
#[must_use]
pub fn user_permissions_key(user_id: Uuid) -> String {
    format!("permissions:{user_id}")
}

/// Key templates this module writes to, for admin tooling.
#[must_use]
pub fn key_templates() -> Vec<&'static str> {
    vec![USER_PERMISSIONS_KEY]
}

/// Errors reported by cache backends.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Key-based cache eviction backend.
#[async_trait]
pub trait PermissionCacheEvictor: Send + Sync {
    /// Remove `key` from the cache. Returns whether an entry existed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be reached or
    /// rejects the operation.
    async fn evict(&self, key: &str) -> Result<bool, CacheError>;
}

/// Evicts per-user permission cache entries after grant changes.
///
/// Eviction is best-effort: a failing key is logged and the remaining
/// evictions still run, since a stale entry expires on its own while an
/// aborted workflow would leave every entry stale.
pub struct CacheInvalidator {
    evictor: Arc<dyn PermissionCacheEvictor>,
}

impl CacheInvalidator {
    #[must_use]
    pub fn new(evictor: Arc<dyn PermissionCacheEvictor>) -> Self {
        Self { evictor }
    }

    /// Evict the cached permission set of every given user, once per user.
    ///
    /// Duplicate ids are collapsed. Returns the number of unique users an
    /// eviction was issued for; failed evictions are logged and counted,
    /// they do not interrupt the rest.
    pub async fn invalidate_users<I>(&self, user_ids: I) -> u64
    where
        I: IntoIterator<Item = Uuid> + Send,
    {
        let unique: BTreeSet<Uuid> = user_ids.into_iter().collect();

        let mut evicted = 0u64;
        for user_id in unique {
            let key = user_permissions_key(user_id);
            if let Err(e) = self.evictor.evict(&key).await {
                tracing::warn!(%user_id, error = %e, "permission cache eviction failed");
            }
            evicted += 1;
        }
        evicted
    }

    /// Remove a single cache entry by exact key. Returns whether it existed.
    ///
    /// Unlike [`Self::invalidate_users`] this surfaces backend failures:
    /// it backs explicit admin operations, not post-commit bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend fails.
    pub async fn clear_key(&self, key: &str) -> Result<bool, CacheError> {
        self.evictor.evict(key).await
    }
}
