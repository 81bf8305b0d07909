//! Read-through lookups over the cache store and the registry.
//!
//! [`LookupService::get`] serves a kind from the cache when it can and from
//! the registry when it must, populating the cache on the way back.
//! [`LookupService::purge`] drops every kind's entry for a set of
//! identifiers.

pub mod codec;
pub mod metrics;
pub mod purge;
pub mod service;
pub mod ttl;

pub use codec::{
    GeoAffiliationCodec, GuardianshipCodec, HistoricalIdentifiersCodec, IdentifiersCodec,
    LookupCodec, PersonInfoCodec,
};
pub use metrics::{CacheOperation, LookupMetrics, NoopMetrics};
pub use purge::{CachePurger, PurgeError, PurgeSummary};
pub use service::LookupService;
pub use ttl::{CacheTtlConfig, TtlError, TtlPolicy};
