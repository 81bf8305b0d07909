use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upstream registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// GraphQL endpoint URL
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Token scope requested for registry calls
    #[serde(default)]
    pub scope: String,

    /// Value of the `TEMA` header
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Value of the `behandlingsnummer` header
    #[serde(default = "default_processing_number")]
    pub processing_number: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_registry_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_registry_url() -> String {
    "http://localhost:8090/graphql".to_string()
}

fn default_theme() -> String {
    "SYK".to_string()
}

fn default_processing_number() -> String {
    "B139".to_string()
}

fn default_registry_timeout_ms() -> u64 {
    10_000
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            scope: String::new(),
            theme: default_theme(),
            processing_number: default_processing_number(),
            timeout_ms: default_registry_timeout_ms(),
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// OAuth2 client-credentials settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token endpoint URL
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_token_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_token_timeout_ms() -> u64 {
    5_000
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_ms: default_token_timeout_ms(),
        }
    }
}

impl TokenConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
