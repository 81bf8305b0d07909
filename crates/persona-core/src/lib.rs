//! Core types for the persona lookup service.
//!
//! This crate owns the vocabulary shared by every other crate in the
//! workspace:
//!
//! - [`LookupKind`] and [`CacheKey`]: the five lookup kinds and the hashed
//!   keys their results are cached under
//! - [`LookupResult`] / [`SourceResult`]: tagged outcomes of a lookup
//! - [`LookupError`] / [`ErrorKind`]: the error taxonomy surfaced to callers
//! - Domain payloads: [`Identifiers`], [`HistoricalIdentifiers`], [`Person`],
//!   [`Guardianship`], [`GeoAffiliation`]

pub mod error;
pub mod geo;
pub mod guardianship;
pub mod ident;
pub mod kind;
pub mod person;
pub mod result;

pub use error::{ErrorKind, LookupError};
pub use geo::{DeclaredGeoType, GeoAffiliation, GeoAffiliationKind};
pub use guardianship::{Guardianship, GuardianshipType};
pub use ident::{HistoricalIdentifiers, Ident, IdentGroup, IdentityAliases, Identifiers};
pub use kind::{CacheKey, LookupKind, UnknownLookupKind};
pub use person::{AddressProtection, Gender, Person};
pub use result::{LookupResult, Provenance, SourceResult};
