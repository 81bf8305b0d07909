use async_trait::async_trait;
use persona_cache::CacheError;
use thiserror::Error;

/// Outcome of a successful purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    /// Keys a delete was issued for.
    pub attempted: usize,
    /// Keys that actually held a value.
    pub deleted: usize,
}

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("cache store unavailable during purge: {0}")]
    StoreUnavailable(#[from] CacheError),
}

/// Target of cache invalidation.
#[async_trait]
pub trait CachePurger: Send + Sync {
    /// Remove every cached kind for each of `identifiers`.
    async fn purge(&self, identifiers: &[String], trace_id: &str)
    -> Result<PurgeSummary, PurgeError>;
}
