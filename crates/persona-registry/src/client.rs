//! GraphQL client for the population registry.

use std::sync::Arc;

use async_trait::async_trait;
use persona_core::{
    GeoAffiliation, Guardianship, IdentityAliases, LookupError, Person, SourceResult,
};
use serde::de::DeserializeOwned;

use crate::config::RegistryConfig;
use crate::dto::{GeoAffiliationDto, GuardianshipDto, IdentsDto, PersonDto};
use crate::envelope::GraphQlResponse;
use crate::query::GraphQlQuery;
use crate::source::RegistrySource;
use crate::token::TokenProvider;

/// Registry client over a single HTTPS POST endpoint.
///
/// Each call attaches a bearer token for the configured scope, the caller's
/// trace id as `Nav-Call-Id`, and the caller-identification headers.
pub struct RegistryClient {
    http_client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    config: RegistryConfig,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http_client,
            tokens,
            config,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        query: &GraphQlQuery,
        trace_id: &str,
    ) -> SourceResult<T> {
        let token = match self.tokens.bearer_token(&self.config.scope).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(trace_id = %trace_id, error = %e, "Failed to obtain registry token");
                return SourceResult::Error(
                    LookupError::generic("failed to obtain bearer token").with_source(e),
                );
            }
        };

        let response = match self
            .http_client
            .post(&self.config.url)
            .bearer_auth(&token.token)
            .header("Accept", "application/json")
            .header("Nav-Call-Id", trace_id)
            .header("TEMA", &self.config.theme)
            .header("behandlingsnummer", &self.config.processing_number)
            .json(query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(trace_id = %trace_id, error = %e, "Registry request failed");
                return SourceResult::Error(
                    LookupError::generic("error sending registry request").with_source(e),
                );
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(trace_id = %trace_id, status = status.as_u16(), "Registry returned error status");
            return SourceResult::Error(LookupError::generic(format!(
                "error (status={}) from registry",
                status.as_u16()
            )));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return SourceResult::Error(
                    LookupError::generic("error reading registry response").with_source(e),
                );
            }
        };
        tracing::debug!(trace_id = %trace_id, bytes = body.len(), "Registry response received");

        match serde_json::from_slice::<GraphQlResponse<T>>(&body) {
            Ok(envelope) => envelope.into_result(),
            Err(e) => SourceResult::Error(
                LookupError::generic(format!("failed to parse registry response: {e}"))
                    .with_source(e),
            ),
        }
    }
}

#[async_trait]
impl RegistrySource for RegistryClient {
    async fn identity_aliases(
        &self,
        ident: &str,
        include_history: bool,
        trace_id: &str,
    ) -> SourceResult<IdentityAliases> {
        self.request::<IdentsDto>(&GraphQlQuery::identity_aliases(ident, include_history), trace_id)
            .await
            .map(IdentityAliases::from)
    }

    async fn person(&self, ident: &str, trace_id: &str) -> SourceResult<Person> {
        self.request::<PersonDto>(&GraphQlQuery::person(ident), trace_id)
            .await
            .and_then(PersonDto::into_person)
    }

    async fn guardianship(&self, ident: &str, trace_id: &str) -> SourceResult<Guardianship> {
        self.request::<GuardianshipDto>(&GraphQlQuery::guardianship(ident), trace_id)
            .await
            .map(Guardianship::from)
    }

    async fn geo_affiliation(&self, ident: &str, trace_id: &str) -> SourceResult<GeoAffiliation> {
        self.request::<GeoAffiliationDto>(&GraphQlQuery::geo_affiliation(ident), trace_id)
            .await
            .map(GeoAffiliation::from)
    }
}
