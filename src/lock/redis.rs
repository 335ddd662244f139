//! Redis-backed lock store shared by all service instances.
//!
//! `acquire` is `SET key token NX PX ttl`; `release` is `DEL key`.
//! Connections come from a `bb8` pool.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis;

use super::{LockError, LockService};

/// Lock store backed by a Redis connection pool.
#[derive(Clone)]
pub struct RedisLockService {
    pool: Pool<RedisConnectionManager>,
}

impl fmt::Debug for RedisLockService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisLockService")
            .field("state", &self.pool.state())
            .finish()
    }
}

impl RedisLockService {
    /// Builds a pool against `url`.
    ///
    /// Connections are established lazily, so an unreachable server only
    /// shows up as failed acquisitions.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Unavailable`] if `url` is not a valid Redis URL.
    pub fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, LockError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|e| LockError::Unavailable(e.to_string()))?;
        let pool = Pool::builder()
            .max_size(max_connections)
            .connection_timeout(connect_timeout)
            .build_unchecked(manager);
        Ok(Self { pool })
    }
}

#[async_trait]
impl LockService for RedisLockService {
    async fn acquire(&self, key: &str, ttl: Duration) -> Result<bool, LockError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| LockError::Unavailable(e.to_string()))?;
        let token = uuid::Uuid::new_v4().to_string();
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        // Nil reply means the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(&token)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut *conn)
            .await
            .map_err(|e| LockError::Unavailable(e.to_string()))?;
        Ok(reply.is_some())
    }

    async fn release(&self, key: &str) -> Result<(), LockError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| LockError::Unavailable(e.to_string()))?;
        let _removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|e| LockError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
