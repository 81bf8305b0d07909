//! Redis cache store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use persona_core::CacheKey;
use redis::AsyncCommands;

use crate::{CacheError, CacheStore};

/// Shared cache backed by a deadpool-redis pool.
///
/// Every command, connection checkout included, is bounded by
/// `command_timeout`.
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: Pool,
    command_timeout: Duration,
}

impl RedisCacheStore {
    pub fn new(pool: Pool, command_timeout: Duration) -> Self {
        Self {
            pool,
            command_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.command_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout {
                operation,
                timeout: self.command_timeout,
            }),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        self.bounded("GET", async {
            let mut conn = self.pool.get().await?;
            let value = conn.get::<_, Option<Vec<u8>>>(key.as_str()).await?;
            tracing::debug!(key = %key, hit = value.is_some(), "Redis GET");
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        // SET EX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);
        self.bounded("SET", async {
            let mut conn = self.pool.get().await?;
            conn.set_ex::<_, _, ()>(key.as_str(), value, ttl_secs).await?;
            tracing::debug!(key = %key, ttl_secs, "Redis SET");
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, CacheError> {
        self.bounded("DEL", async {
            let mut conn = self.pool.get().await?;
            let removed: u64 = conn.del(key.as_str()).await?;
            Ok(removed > 0)
        })
        .await
    }

    async fn is_available(&self) -> bool {
        tokio::time::timeout(self.command_timeout, self.pool.get())
            .await
            .is_ok_and(|conn| conn.is_ok())
    }

    fn mode(&self) -> &'static str {
        "redis"
    }
}
