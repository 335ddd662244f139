//! Per-resource mutual exclusion with expiry.
//!
//! [`LockService`] is the coordination-store seam: set a marker only if
//! absent, with a TTL, and delete it unconditionally. The TTL bounds how
//! long a crashed holder can keep a resource locked, so liveness never
//! depends on an explicit release.
//!
//! [`LockGuard`] scopes an acquired lock: callers release it explicitly
//! with [`LockGuard::release`], and a guard dropped without release (early
//! return, panic, cancelled future) schedules the release on the runtime.

pub mod memory;
pub mod redis;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use memory::InMemoryLockService;
pub use redis::RedisLockService;

use crate::domain::ResourceId;

/// Coordination-store failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LockError {
    /// The store could not be reached or returned an error.
    #[error("lock store unavailable: {0}")]
    Unavailable(String),
}

/// Key-scoped set-if-absent lock with automatic expiry.
#[async_trait]
pub trait LockService: Send + Sync + fmt::Debug {
    /// Attempts to take `key` for `ttl`.
    ///
    /// Returns `Ok(true)` iff this caller now owns the key.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Unavailable`] if the store cannot answer.
    /// Callers must treat that as "not acquired".
    async fn acquire(&self, key: &str, ttl: Duration) -> Result<bool, LockError>;

    /// Removes `key` regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Unavailable`] if the store cannot answer; the
    /// TTL still frees the key eventually.
    async fn release(&self, key: &str) -> Result<(), LockError>;
}

/// Lock key construction and expiry, tunable without code changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockSettings {
    /// How long a lock survives without release.
    pub ttl: Duration,
    /// Prepended to the resource id to form the key.
    pub key_prefix: String,
}

impl LockSettings {
    /// Builds settings from a TTL and key prefix.
    #[must_use]
    pub fn new(ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self {
            ttl,
            key_prefix: key_prefix.into(),
        }
    }

    /// Lock key for a resource: one lock per resource, never per request.
    #[must_use]
    pub fn key_for(&self, resource_id: ResourceId) -> String {
        format!("{}{}", self.key_prefix, resource_id)
    }
}

impl Default for LockSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), "lock:resource:")
    }
}

/// An acquired lock that is released on every exit path.
pub struct LockGuard {
    locks: Arc<dyn LockService>,
    key: String,
    released: bool,
}

impl fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockGuard")
            .field("key", &self.key)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl LockGuard {
    /// Tries to take `key` and wraps it in a guard.
    ///
    /// Returns `Ok(None)` when the key is held by someone else.
    ///
    /// # Errors
    ///
    /// Propagates [`LockError`] from the store.
    pub async fn acquire(
        locks: Arc<dyn LockService>,
        key: String,
        ttl: Duration,
    ) -> Result<Option<Self>, LockError> {
        if !locks.acquire(&key, ttl).await? {
            return Ok(None);
        }
        tracing::debug!(%key, ttl_ms = ttl.as_millis() as u64, "lock acquired");
        Ok(Some(Self {
            locks,
            key,
            released: false,
        }))
    }

    /// The locked key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Releases the lock now. Failures are logged, not returned.
    pub async fn release(mut self) {
        self.released = true;
        release_logged(self.locks.as_ref(), &self.key).await;
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let locks = Arc::clone(&self.locks);
        let key = std::mem::take(&mut self.key);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    release_logged(locks.as_ref(), &key).await;
                });
            }
            Err(_) => {
                tracing::warn!(%key, "lock guard dropped outside runtime; relying on TTL");
            }
        }
    }
}

async fn release_logged(locks: &dyn LockService, key: &str) {
    match locks.release(key).await {
        Ok(()) => tracing::debug!(%key, "lock released"),
        Err(e) => tracing::warn!(%key, error = %e, "lock release failed; relying on TTL"),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefix_plus_resource() {
        let settings = LockSettings::default();
        assert_eq!(settings.key_for(ResourceId::new(12)), "lock:resource:12");

        let custom = LockSettings::new(Duration::from_millis(250), "rb:");
        assert_eq!(custom.key_for(ResourceId::new(1)), "rb:1");
    }

    #[tokio::test]
    async fn explicit_release_frees_key() {
        let locks: Arc<dyn LockService> = Arc::new(InMemoryLockService::new());
        let ttl = Duration::from_secs(5);

        let Ok(Some(guard)) = LockGuard::acquire(Arc::clone(&locks), "k".into(), ttl).await else {
            panic!("first acquire should succeed");
        };
        assert_eq!(guard.key(), "k");

        let second = LockGuard::acquire(Arc::clone(&locks), "k".into(), ttl).await;
        assert!(matches!(second, Ok(None)));

        guard.release().await;
        assert!(matches!(locks.acquire("k", ttl).await, Ok(true)));
    }

    #[tokio::test]
    async fn dropped_guard_releases_in_background() {
        let locks: Arc<dyn LockService> = Arc::new(InMemoryLockService::new());
        let ttl = Duration::from_secs(60);

        let Ok(Some(guard)) = LockGuard::acquire(Arc::clone(&locks), "k".into(), ttl).await else {
            panic!("acquire should succeed");
        };
        drop(guard);

        // Let the spawned release task run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(matches!(locks.acquire("k", ttl).await, Ok(true)));
    }
}
