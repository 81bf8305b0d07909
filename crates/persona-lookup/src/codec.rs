//! One codec per lookup kind.
//!
//! A codec ties a [`LookupKind`] to its payload type, knows which registry
//! call produces that payload, and owns the cache wire format.

use futures_util::future::BoxFuture;
use persona_core::{
    GeoAffiliation, Guardianship, HistoricalIdentifiers, Identifiers, LookupKind, Person,
    Provenance, SourceResult,
};
use persona_registry::RegistrySource;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Cached form of a value: `{"provenance":"CACHE","value":{...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedValue<T> {
    pub provenance: Provenance,
    pub value: T,
}

pub trait LookupCodec: Send + Sync + 'static {
    const KIND: LookupKind;

    type Value: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Fetch the payload for `ident` from the registry.
    fn fetch<'a>(
        source: &'a dyn RegistrySource,
        ident: &'a str,
        trace_id: &'a str,
    ) -> BoxFuture<'a, SourceResult<Self::Value>>;

    /// Serialize for the cache. The stored provenance is always `Cache`.
    fn encode(value: &Self::Value) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&CachedValue {
            provenance: Provenance::Cache,
            value,
        })
    }

    fn decode(bytes: &[u8]) -> Result<Self::Value, serde_json::Error> {
        serde_json::from_slice::<CachedValue<Self::Value>>(bytes).map(|cached| cached.value)
    }
}

pub struct IdentifiersCodec;

impl LookupCodec for IdentifiersCodec {
    const KIND: LookupKind = LookupKind::Identifiers;
    type Value = Identifiers;

    fn fetch<'a>(
        source: &'a dyn RegistrySource,
        ident: &'a str,
        trace_id: &'a str,
    ) -> BoxFuture<'a, SourceResult<Identifiers>> {
        Box::pin(async move {
            source
                .identity_aliases(ident, false, trace_id)
                .await
                .and_then(|aliases| match Identifiers::from_aliases(&aliases) {
                    Some(identifiers) => SourceResult::Found(identifiers),
                    None => SourceResult::NotFound,
                })
        })
    }
}

pub struct HistoricalIdentifiersCodec;

impl LookupCodec for HistoricalIdentifiersCodec {
    const KIND: LookupKind = LookupKind::HistoricalIdentifiers;
    type Value = HistoricalIdentifiers;

    fn fetch<'a>(
        source: &'a dyn RegistrySource,
        ident: &'a str,
        trace_id: &'a str,
    ) -> BoxFuture<'a, SourceResult<HistoricalIdentifiers>> {
        Box::pin(async move {
            source
                .identity_aliases(ident, true, trace_id)
                .await
                .map(|aliases| HistoricalIdentifiers::from_aliases(&aliases))
        })
    }
}

pub struct PersonInfoCodec;

impl LookupCodec for PersonInfoCodec {
    const KIND: LookupKind = LookupKind::PersonInfo;
    type Value = Person;

    fn fetch<'a>(
        source: &'a dyn RegistrySource,
        ident: &'a str,
        trace_id: &'a str,
    ) -> BoxFuture<'a, SourceResult<Person>> {
        source.person(ident, trace_id)
    }
}

pub struct GuardianshipCodec;

impl LookupCodec for GuardianshipCodec {
    const KIND: LookupKind = LookupKind::Guardianship;
    type Value = Guardianship;

    fn fetch<'a>(
        source: &'a dyn RegistrySource,
        ident: &'a str,
        trace_id: &'a str,
    ) -> BoxFuture<'a, SourceResult<Guardianship>> {
        source.guardianship(ident, trace_id)
    }
}

pub struct GeoAffiliationCodec;

impl LookupCodec for GeoAffiliationCodec {
    const KIND: LookupKind = LookupKind::GeoAffiliation;
    type Value = GeoAffiliation;

    fn fetch<'a>(
        source: &'a dyn RegistrySource,
        ident: &'a str,
        trace_id: &'a str,
    ) -> BoxFuture<'a, SourceResult<GeoAffiliation>> {
        source.geo_affiliation(ident, trace_id)
    }
}
