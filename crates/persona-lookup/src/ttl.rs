//! Cache entry lifetimes per lookup kind.

use std::collections::HashMap;
use std::time::Duration;

use persona_core::{LookupKind, UnknownLookupKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// TTL settings as they appear in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// Lifetime for every kind without an override, in seconds
    #[serde(default = "default_standard_ttl_secs")]
    pub standard_ttl_secs: u64,

    /// Per-kind lifetimes in seconds, keyed by kind name (e.g. `person_info`)
    #[serde(default)]
    pub ttl_overrides: HashMap<String, u64>,
}

fn default_standard_ttl_secs() -> u64 {
    7 * SECONDS_PER_DAY
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            standard_ttl_secs: default_standard_ttl_secs(),
            ttl_overrides: HashMap::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TtlError {
    #[error("TTL for {0} must be greater than zero")]
    Zero(String),

    #[error(transparent)]
    UnknownKind(#[from] UnknownLookupKind),
}

/// Resolved TTLs. Every value is non-zero.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    standard: Duration,
    overrides: HashMap<LookupKind, Duration>,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            standard: Duration::from_secs(default_standard_ttl_secs()),
            overrides: HashMap::new(),
        }
    }
}

impl TtlPolicy {
    pub fn from_config(config: &CacheTtlConfig) -> Result<Self, TtlError> {
        if config.standard_ttl_secs == 0 {
            return Err(TtlError::Zero("standard lookups".to_string()));
        }

        let mut overrides = HashMap::new();
        for (name, secs) in &config.ttl_overrides {
            let kind: LookupKind = name.parse()?;
            if *secs == 0 {
                return Err(TtlError::Zero(kind.to_string()));
            }
            overrides.insert(kind, Duration::from_secs(*secs));
        }

        Ok(Self {
            standard: Duration::from_secs(config.standard_ttl_secs),
            overrides,
        })
    }

    pub fn ttl_for(&self, kind: LookupKind) -> Duration {
        self.overrides.get(&kind).copied().unwrap_or(self.standard)
    }
}
