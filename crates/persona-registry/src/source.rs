use async_trait::async_trait;
use persona_core::{GeoAffiliation, Guardianship, IdentityAliases, Person, SourceResult};

/// The upstream system of record.
///
/// Every method takes the raw identifier and the caller's trace id, and maps
/// the upstream answer into a [`SourceResult`]. Implementations never retry.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// All identifiers for the subject. Historical ones are only requested
    /// when `include_history` is set.
    async fn identity_aliases(
        &self,
        ident: &str,
        include_history: bool,
        trace_id: &str,
    ) -> SourceResult<IdentityAliases>;

    async fn person(&self, ident: &str, trace_id: &str) -> SourceResult<Person>;

    async fn guardianship(&self, ident: &str, trace_id: &str) -> SourceResult<Guardianship>;

    async fn geo_affiliation(&self, ident: &str, trace_id: &str) -> SourceResult<GeoAffiliation>;
}
