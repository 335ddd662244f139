//! In-process lock store for single-instance deployments and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{LockError, LockService};

/// Set-if-absent lock table with per-key expiry.
///
/// Expired entries are treated as absent on the next `acquire`, which
/// mirrors how a TTL key behaves in the shared store.
#[derive(Debug, Default)]
pub struct InMemoryLockService {
    entries: Mutex<HashMap<String, Instant>>,
}

impl InMemoryLockService {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockService for InMemoryLockService {
    async fn acquire(&self, key: &str, ttl: Duration) -> Result<bool, LockError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if let Some(expires_at) = entries.get(key)
            && *expires_at > now
        {
            return Ok(false);
        }
        entries.insert(key.to_string(), now + ttl);
        Ok(true)
    }

    async fn release(&self, key: &str) -> Result<(), LockError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
