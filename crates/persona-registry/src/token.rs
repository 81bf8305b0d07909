//! Bearer token acquisition.
//!
//! [`ClientCredentialsTokenProvider`] performs the OAuth2 client-credentials
//! grant and keeps one token per scope in memory until shortly before it
//! expires.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::TokenConfig;
use crate::error::TokenError;

/// Tokens are refreshed this long before they expire.
const EXPIRY_LEEWAY: Duration = Duration::from_secs(60);

/// An access token and the instant it stops being valid.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Instant,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Instant::now() + expires_in,
        }
    }

    /// Whether the token is still usable with the refresh leeway applied.
    pub fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_LEEWAY < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer credentials for outbound calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self, scope: &str) -> Result<AccessToken, TokenError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// OAuth2 client-credentials token provider with a per-scope cache.
pub struct ClientCredentialsTokenProvider {
    http_client: reqwest::Client,
    config: TokenConfig,
    cache: Arc<RwLock<HashMap<String, AccessToken>>>,
}

impl ClientCredentialsTokenProvider {
    pub fn new(config: TokenConfig) -> Result<Self, TokenError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TokenError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    async fn cached(&self, scope: &str) -> Option<AccessToken> {
        let cache = self.cache.read().await;
        cache.get(scope).filter(|token| token.is_fresh()).cloned()
    }

    async fn fetch(&self, scope: &str) -> Result<AccessToken, TokenError> {
        tracing::debug!(scope = %scope, "Requesting access token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token request failed");
                TokenError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::Parse(e.to_string()))?;

        Ok(AccessToken::new(
            body.access_token,
            Duration::from_secs(body.expires_in),
        ))
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn bearer_token(&self, scope: &str) -> Result<AccessToken, TokenError> {
        if let Some(token) = self.cached(scope).await {
            tracing::trace!(scope = %scope, "Token cache hit");
            return Ok(token);
        }

        let token = self.fetch(scope).await?;
        self.cache
            .write()
            .await
            .insert(scope.to_string(), token.clone());
        Ok(token)
    }
}
