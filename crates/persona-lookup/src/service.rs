//! Read-through lookup orchestration.

use std::sync::Arc;

use async_trait::async_trait;
use persona_cache::CacheStore;
use persona_core::{
    CacheKey, GeoAffiliation, Guardianship, HistoricalIdentifiers, Identifiers, LookupKind,
    LookupResult, Person, Provenance, SourceResult,
};
use persona_registry::RegistrySource;

use crate::codec::{
    GeoAffiliationCodec, GuardianshipCodec, HistoricalIdentifiersCodec, IdentifiersCodec,
    LookupCodec, PersonInfoCodec,
};
use crate::metrics::{CacheOperation, LookupMetrics, NoopMetrics};
use crate::purge::{CachePurger, PurgeError, PurgeSummary};
use crate::ttl::TtlPolicy;

/// Serves lookups from the cache, falling back to the registry.
///
/// The cache never fails a lookup: read errors and undecodable entries count
/// as misses, write errors are logged and dropped.
#[derive(Clone)]
pub struct LookupService {
    store: Arc<dyn CacheStore>,
    source: Arc<dyn RegistrySource>,
    ttl: TtlPolicy,
    metrics: Arc<dyn LookupMetrics>,
}

impl LookupService {
    pub fn new(store: Arc<dyn CacheStore>, source: Arc<dyn RegistrySource>, ttl: TtlPolicy) -> Self {
        Self {
            store,
            source,
            ttl,
            metrics: Arc::new(NoopMetrics),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn LookupMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Look up one kind for `ident`.
    #[tracing::instrument(skip_all, fields(kind = %C::KIND, trace_id = %trace_id))]
    pub async fn get<C: LookupCodec>(&self, ident: &str, trace_id: &str) -> LookupResult<C::Value> {
        let key = C::KIND.cache_key(ident);

        if let Some(value) = self.read_cached::<C>(&key).await {
            self.metrics
                .record_cache_usage(C::KIND, CacheOperation::Read);
            return LookupResult::found(value, Provenance::Cache);
        }

        match C::fetch(self.source.as_ref(), ident, trace_id).await {
            SourceResult::Found(value) => {
                self.write_cached::<C>(&key, &value).await;
                LookupResult::found(value, Provenance::Source)
            }
            SourceResult::NotFound => {
                tracing::debug!("Not found in registry");
                LookupResult::NotFound
            }
            SourceResult::Error(e) => {
                tracing::warn!(error = %e, code = ?e.code, "Registry lookup failed");
                LookupResult::Error(e)
            }
        }
    }

    async fn read_cached<C: LookupCodec>(&self, key: &CacheKey) -> Option<C::Value> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match C::decode(&bytes) {
            Ok(value) => {
                tracing::debug!("Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached value could not be decoded, treating as miss");
                None
            }
        }
    }

    async fn write_cached<C: LookupCodec>(&self, key: &CacheKey, value: &C::Value) {
        let bytes = match C::encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode value for cache");
                return;
            }
        };

        match self.store.set(key, &bytes, self.ttl.ttl_for(C::KIND)).await {
            Ok(()) => self
                .metrics
                .record_cache_usage(C::KIND, CacheOperation::Write),
            Err(e) => tracing::warn!(error = %e, "Cache write failed"),
        }
    }

    pub async fn identifiers(&self, ident: &str, trace_id: &str) -> LookupResult<Identifiers> {
        self.get::<IdentifiersCodec>(ident, trace_id).await
    }

    pub async fn person(&self, ident: &str, trace_id: &str) -> LookupResult<Person> {
        self.get::<PersonInfoCodec>(ident, trace_id).await
    }

    pub async fn historical_identifiers(
        &self,
        ident: &str,
        trace_id: &str,
    ) -> LookupResult<HistoricalIdentifiers> {
        self.get::<HistoricalIdentifiersCodec>(ident, trace_id).await
    }

    pub async fn guardianship(&self, ident: &str, trace_id: &str) -> LookupResult<Guardianship> {
        self.get::<GuardianshipCodec>(ident, trace_id).await
    }

    pub async fn geo_affiliation(&self, ident: &str, trace_id: &str) -> LookupResult<GeoAffiliation> {
        self.get::<GeoAffiliationCodec>(ident, trace_id).await
    }

    /// Delete every kind's cache entry for each identifier.
    ///
    /// Missing keys are not failures. Stops at the first store error.
    #[tracing::instrument(skip_all, fields(trace_id = %trace_id, identifiers = identifiers.len()))]
    pub async fn purge(
        &self,
        identifiers: &[String],
        trace_id: &str,
    ) -> Result<PurgeSummary, PurgeError> {
        let mut summary = PurgeSummary::default();

        for ident in identifiers {
            for kind in LookupKind::ALL {
                summary.attempted += 1;
                if self.store.delete(&kind.cache_key(ident)).await? {
                    summary.deleted += 1;
                }
            }
        }

        tracing::info!(
            attempted = summary.attempted,
            deleted = summary.deleted,
            "Cache purged"
        );
        Ok(summary)
    }
}

#[async_trait]
impl CachePurger for LookupService {
    async fn purge(
        &self,
        identifiers: &[String],
        trace_id: &str,
    ) -> Result<PurgeSummary, PurgeError> {
        LookupService::purge(self, identifiers, trace_id).await
    }
}
