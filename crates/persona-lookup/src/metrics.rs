use persona_core::LookupKind;

/// Cache operation reported to a [`LookupMetrics`] sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    /// A value was served from the cache.
    Read,
    /// A freshly fetched value was written to the cache.
    Write,
}

impl CacheOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Sink for cache usage counts.
pub trait LookupMetrics: Send + Sync {
    fn record_cache_usage(&self, kind: LookupKind, operation: CacheOperation);
}

/// Sink that drops every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl LookupMetrics for NoopMetrics {
    fn record_cache_usage(&self, _kind: LookupKind, _operation: CacheOperation) {}
}
