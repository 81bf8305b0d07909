//! Identity aliases and the identifier payloads derived from them.

use serde::{Deserialize, Serialize};

/// Identifier group as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentGroup {
    /// National identity number (11 digits).
    NationalId,
    /// Registry-internal actor id (13 digits).
    ActorId,
    /// Temporary identifier assigned before a national id exists.
    TemporaryId,
}

/// A single identifier with its group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ident {
    pub value: String,
    pub group: IdentGroup,
}

impl Ident {
    pub fn new(value: impl Into<String>, group: IdentGroup) -> Self {
        Self {
            value: value.into(),
            group,
        }
    }
}

/// All identifiers referring to one subject, split into current and
/// historical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityAliases {
    pub current: Vec<Ident>,
    pub historical: Vec<Ident>,
}

impl IdentityAliases {
    /// Build from `(ident, historical)` pairs, keeping registry order.
    pub fn partition(idents: impl IntoIterator<Item = (Ident, bool)>) -> Self {
        let mut aliases = Self::default();
        for (ident, historical) in idents {
            if historical {
                aliases.historical.push(ident);
            } else {
                aliases.current.push(ident);
            }
        }
        aliases
    }

    /// First current identifier of the given group.
    pub fn current_of(&self, group: IdentGroup) -> Option<&str> {
        self.current
            .iter()
            .find(|ident| ident.group == group)
            .map(|ident| ident.value.as_str())
    }

    /// All historical identifiers of the given group, in registry order.
    pub fn historical_of(&self, group: IdentGroup) -> impl Iterator<Item = &str> {
        self.historical
            .iter()
            .filter(move |ident| ident.group == group)
            .map(|ident| ident.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.historical.is_empty()
    }
}

/// The current national id / actor id pair for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifiers {
    pub national_id: String,
    pub actor_id: String,
    #[serde(default)]
    pub temporary_id: Option<String>,
}

impl Identifiers {
    /// Project the current identifiers out of an alias set.
    ///
    /// Returns `None` unless both a national id and an actor id are current.
    pub fn from_aliases(aliases: &IdentityAliases) -> Option<Self> {
        Some(Self {
            national_id: aliases.current_of(IdentGroup::NationalId)?.to_string(),
            actor_id: aliases.current_of(IdentGroup::ActorId)?.to_string(),
            temporary_id: aliases
                .current_of(IdentGroup::TemporaryId)
                .map(str::to_string),
        })
    }
}

/// Previously assigned national ids for a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalIdentifiers {
    pub national_ids: Vec<String>,
}

impl HistoricalIdentifiers {
    pub fn from_aliases(aliases: &IdentityAliases) -> Self {
        Self {
            national_ids: aliases
                .historical_of(IdentGroup::NationalId)
                .map(str::to_string)
                .collect(),
        }
    }
}
