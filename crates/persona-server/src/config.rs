use std::net::SocketAddr;
use std::time::Duration;

use persona_cache::RedisConfig;
use persona_events::EventsConfig;
use persona_lookup::{CacheTtlConfig, TtlPolicy};
use persona_registry::{RegistryConfig, TokenConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Redis configuration
    #[serde(default)]
    pub redis: RedisConfig,
    /// Cache entry lifetimes
    #[serde(default)]
    pub cache: CacheTtlConfig,
    /// Upstream registry
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Client-credentials token endpoint for registry calls
    #[serde(default)]
    pub token: TokenConfig,
    /// Change-event consumer
    #[serde(default)]
    pub events: EventsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.request_timeout_ms == 0 {
            return Err("server.request_timeout_ms must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Cache validation
        TtlPolicy::from_config(&self.cache).map_err(|e| format!("cache config error: {e}"))?;
        if self.redis.enabled {
            if self.redis.pool_size == 0 {
                return Err("redis.pool_size must be > 0".into());
            }
            if self.redis.timeout_ms == 0 || self.redis.command_timeout_ms == 0 {
                return Err("redis timeouts must be > 0".into());
            }
        }
        // Registry validation
        url::Url::parse(&self.registry.url)
            .map_err(|e| format!("registry.url is not a valid URL: {e}"))?;
        if self.registry.timeout_ms == 0 || self.token.timeout_ms == 0 {
            return Err("registry and token timeouts must be > 0".into());
        }
        if self.token.endpoint.is_empty() {
            return Err("token.endpoint is required".into());
        }
        url::Url::parse(&self.token.endpoint)
            .map_err(|e| format!("token.endpoint is not a valid URL: {e}"))?;
        if self.token.client_id.is_empty() {
            return Err("token.client_id is required".into());
        }
        // Events validation
        if self.events.enabled {
            if self.events.brokers.is_empty() || self.events.topic.is_empty() {
                return Err("events.enabled=true requires events.brokers and events.topic".into());
            }
            if self.events.group_id.is_empty() {
                return Err("events.group_id must not be empty".into());
            }
            if self.events.poll_timeout_ms == 0 {
                return Err("events.poll_timeout_ms must be > 0".into());
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for handling one request, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

pub mod loader {
    use std::path::{Path, PathBuf};

    use config::{Config, Environment, File};

    use super::AppConfig;

    /// Environment variable naming the configuration file.
    pub const CONFIG_PATH_VAR: &str = "PERSONA_CONFIG";

    /// Configuration file used when [`CONFIG_PATH_VAR`] is unset.
    pub const DEFAULT_CONFIG_FILE: &str = "persona.toml";

    /// The explicitly configured file, if any.
    pub fn configured_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Load `path` (or the optional default file), apply
    /// `PERSONA__SECTION__KEY` environment overrides, then validate.
    ///
    /// An explicit path must exist. The default file may be absent, in which
    /// case only defaults and the environment apply.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let merged: AppConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PERSONA")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| format!("failed to load configuration: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
