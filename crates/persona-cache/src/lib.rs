//! Cache store for lookup results.
//!
//! The store is an accelerator, never a source of truth. Every adapter turns
//! transport failures into [`CacheError`] so callers can degrade to a miss.
//!
//! ## Adapters
//!
//! - **Redis**: shared across instances, pooled through deadpool-redis
//! - **Local**: single-instance DashMap with per-entry TTL

pub mod config;
pub mod error;
pub mod local;
pub mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use persona_core::CacheKey;

pub use config::RedisConfig;
pub use error::CacheError;
pub use local::LocalCacheStore;
pub use redis_store::RedisCacheStore;

/// Key/value store with TTL.
///
/// Keys are always hashed [`CacheKey`]s; values are opaque bytes.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value. `Ok(None)` is a plain miss.
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError>;

    /// Write a value that expires after `ttl`.
    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Delete a value. Returns whether a value was removed; a missing key is
    /// not an error.
    async fn delete(&self, key: &CacheKey) -> Result<bool, CacheError>;

    /// Health probe used by readiness checks.
    async fn is_available(&self) -> bool;

    /// Short adapter name for logs.
    fn mode(&self) -> &'static str;
}

/// Create the cache store for the given configuration.
///
/// A [`LocalCacheStore`] is used only when Redis is disabled. With Redis
/// enabled the store is always Redis, even if the first connection fails:
/// per-call errors degrade to cache misses and readiness reports the outage,
/// while a private local cache would never see purges made elsewhere.
pub async fn create_cache_store(
    config: &RedisConfig,
) -> Result<std::sync::Arc<dyn CacheStore>, CacheError> {
    use std::sync::Arc;

    if !config.enabled {
        tracing::info!("Redis disabled, using local cache only");
        return Ok(Arc::new(LocalCacheStore::new()));
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    let mut pool_config = deadpool_redis::PoolConfig::new(config.pool_size);
    pool_config.timeouts.wait = Some(Duration::from_millis(config.timeout_ms));
    pool_config.timeouts.create = Some(Duration::from_millis(config.timeout_ms));
    pool_config.timeouts.recycle = Some(Duration::from_millis(config.timeout_ms));
    redis_config.pool = Some(pool_config);

    let pool = redis_config
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| CacheError::Config(format!("failed to create Redis pool: {e}")))?;

    match pool.get().await {
        Ok(_) => tracing::info!("Connected to Redis"),
        Err(e) => tracing::warn!(
            error = %e,
            "Redis not reachable yet, lookups bypass the cache until it recovers"
        ),
    }

    Ok(Arc::new(RedisCacheStore::new(
        pool,
        Duration::from_millis(config.command_timeout_ms),
    )))
}
