//! Lookup outcomes.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Where a found value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    /// Served from the cache store.
    Cache,
    /// Fetched live from the upstream registry.
    Source,
}

/// Outcome of a read-through lookup, as returned to callers.
#[derive(Debug)]
pub enum LookupResult<T> {
    Found { value: T, provenance: Provenance },
    NotFound,
    Error(LookupError),
}

impl<T> LookupResult<T> {
    pub fn found(value: T, provenance: Provenance) -> Self {
        Self::Found { value, provenance }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Found { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            Self::Found { provenance, .. } => Some(*provenance),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LookupResult<U> {
        match self {
            Self::Found { value, provenance } => LookupResult::Found {
                value: f(value),
                provenance,
            },
            Self::NotFound => LookupResult::NotFound,
            Self::Error(e) => LookupResult::Error(e),
        }
    }
}

/// Outcome of a single upstream registry query.
#[derive(Debug)]
pub enum SourceResult<T> {
    Found(T),
    NotFound,
    Error(LookupError),
}

impl<T> SourceResult<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceResult<U> {
        self.and_then(|value| SourceResult::Found(f(value)))
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> SourceResult<U>) -> SourceResult<U> {
        match self {
            Self::Found(value) => f(value),
            Self::NotFound => SourceResult::NotFound,
            Self::Error(e) => SourceResult::Error(e),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl<T> From<Result<T, LookupError>> for SourceResult<T> {
    fn from(result: Result<T, LookupError>) -> Self {
        match result {
            Ok(value) => Self::Found(value),
            Err(e) => Self::Error(e),
        }
    }
}
