//! Geographic affiliation and its classification.

use serde::{Deserialize, Serialize};

/// Affiliation type as declared by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclaredGeoType {
    District,
    Municipality,
    Abroad,
    Undefined,
}

/// Classified affiliation, derived from which fields are actually present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoAffiliationKind {
    District,
    Municipality,
    Abroad,
    AbroadUnknownCountry,
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoAffiliation {
    pub kind: GeoAffiliationKind,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

impl GeoAffiliation {
    /// Classify an affiliation.
    ///
    /// Precedence: district, then municipality, then country. Only when all
    /// three are absent does the declared type matter, and then only to tell
    /// an abroad affiliation with unknown country apart from an undefined one.
    /// Blank values count as absent.
    pub fn classify(
        declared: DeclaredGeoType,
        country: Option<String>,
        municipality: Option<String>,
        district: Option<String>,
    ) -> Self {
        let country = country.filter(|v| !v.trim().is_empty());
        let municipality = municipality.filter(|v| !v.trim().is_empty());
        let district = district.filter(|v| !v.trim().is_empty());

        let kind = if district.is_some() {
            GeoAffiliationKind::District
        } else if municipality.is_some() {
            GeoAffiliationKind::Municipality
        } else if country.is_some() {
            GeoAffiliationKind::Abroad
        } else if declared == DeclaredGeoType::Abroad {
            GeoAffiliationKind::AbroadUnknownCountry
        } else {
            GeoAffiliationKind::Undefined
        };

        Self {
            kind,
            country,
            municipality,
            district,
        }
    }
}
