//! GraphQL request bodies.

use serde::Serialize;
use serde_json::{Value, json};

const HENT_IDENTER: &str = include_str!("../queries/hent_identer.graphql");
const HENT_PERSON: &str = include_str!("../queries/hent_person.graphql");
const HENT_VERGEMAAL: &str = include_str!("../queries/hent_vergemaal.graphql");
const HENT_GEOGRAFISK_TILKNYTNING: &str =
    include_str!("../queries/hent_geografisk_tilknytning.graphql");

/// Request body sent to the registry endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlQuery {
    pub query: String,
    pub variables: Value,
}

impl GraphQlQuery {
    fn new(document: &str, variables: Value) -> Self {
        Self {
            query: document.replace(['\n', '\r'], ""),
            variables,
        }
    }

    pub fn identity_aliases(ident: &str, include_history: bool) -> Self {
        Self::new(
            HENT_IDENTER,
            json!({ "ident": ident, "historikk": include_history }),
        )
    }

    pub fn person(ident: &str) -> Self {
        Self::new(HENT_PERSON, json!({ "ident": ident }))
    }

    pub fn guardianship(ident: &str) -> Self {
        Self::new(HENT_VERGEMAAL, json!({ "ident": ident }))
    }

    pub fn geo_affiliation(ident: &str) -> Self {
        Self::new(HENT_GEOGRAFISK_TILKNYTNING, json!({ "ident": ident }))
    }
}
