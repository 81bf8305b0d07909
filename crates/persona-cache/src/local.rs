//! In-memory cache store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use persona_core::CacheKey;

use crate::{CacheError, CacheStore};

/// A cached entry with TTL support.
#[derive(Clone, Debug)]
struct CachedEntry {
    data: Arc<Vec<u8>>,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Single-instance cache backed by a DashMap.
///
/// Expired entries are dropped lazily on read.
#[derive(Clone, Default)]
pub struct LocalCacheStore {
    entries: Arc<DashMap<String, CachedEntry>>,
}

impl LocalCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        if let Some(entry) = self.entries.get(key.as_str()) {
            if !entry.is_expired() {
                return Ok(Some(entry.data.as_ref().clone()));
            }
            drop(entry);
            self.entries.remove(key.as_str());
        }
        Ok(None)
    }

    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .insert(key.as_str().to_string(), CachedEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self
            .entries
            .remove(key.as_str())
            .is_some_and(|(_, entry)| !entry.is_expired()))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn mode(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_core::LookupKind;

    #[tokio::test]
    async fn test_local_get_set() {
        let store = LocalCacheStore::new();
        let key = LookupKind::Identifiers.cache_key("12345678901");

        store.set(&key, b"value", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some(b"value".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_local_expiration() {
        let store = LocalCacheStore::new();
        let key = LookupKind::PersonInfo.cache_key("12345678901");

        store.set(&key, b"value", Duration::from_millis(50)).await.unwrap();
        assert!(store.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(store.get(&key).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_local_delete_missing_key_is_ok() {
        let store = LocalCacheStore::new();
        let key = LookupKind::Guardianship.cache_key("12345678901");

        assert!(!store.delete(&key).await.unwrap());

        store.set(&key, b"value", Duration::from_secs(60)).await.unwrap();
        assert!(store.delete(&key).await.unwrap());
        assert!(store.get(&key).await.unwrap().is_none());
    }
}
