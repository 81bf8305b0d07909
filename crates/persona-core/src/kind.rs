//! Lookup kinds and hashed cache keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The five lookups the service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Identifiers,
    PersonInfo,
    HistoricalIdentifiers,
    Guardianship,
    GeoAffiliation,
}

impl LookupKind {
    pub const ALL: [LookupKind; 5] = [
        LookupKind::Identifiers,
        LookupKind::PersonInfo,
        LookupKind::HistoricalIdentifiers,
        LookupKind::Guardianship,
        LookupKind::GeoAffiliation,
    ];

    /// Prefix hashed together with the raw identifier to form the cache key.
    ///
    /// These values are part of the cache wire format; changing one orphans
    /// every entry written under the old prefix.
    pub const fn cache_prefix(self) -> &'static str {
        match self {
            Self::Identifiers => "ident_",
            Self::PersonInfo => "personinfo_",
            Self::HistoricalIdentifiers => "historiske_identer_",
            Self::Guardianship => "vergemaal_",
            Self::GeoAffiliation => "geografisk_tilknytning_",
        }
    }

    /// Stable label for logs and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identifiers => "identifiers",
            Self::PersonInfo => "person_info",
            Self::HistoricalIdentifiers => "historical_identifiers",
            Self::Guardianship => "guardianship",
            Self::GeoAffiliation => "geo_affiliation",
        }
    }

    pub fn cache_key(self, raw_identifier: &str) -> CacheKey {
        CacheKey::derive(self.cache_prefix(), raw_identifier)
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupKind {
    type Err = UnknownLookupKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LookupKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownLookupKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lookup kind `{0}`")]
pub struct UnknownLookupKind(pub String);

/// Lowercase hex SHA-256 of `prefix + raw identifier`.
///
/// The only way to build a key is by hashing, so raw identifiers never reach
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(prefix: &str, raw_identifier: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(prefix.as_bytes());
        hasher.update(raw_identifier.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
