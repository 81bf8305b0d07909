//! Population registry access.
//!
//! - [`RegistrySource`] - the seam the lookup service fetches through
//! - [`RegistryClient`] - GraphQL-over-HTTPS implementation of it
//! - [`TokenProvider`] - bearer credentials for the registry, with
//!   [`ClientCredentialsTokenProvider`] as the OAuth2 implementation
//!
//! Nothing here retries. Transport and credential failures come back as
//! `SourceResult::Error` and the caller decides what to do.

pub mod client;
pub mod config;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod query;
pub mod source;
pub mod token;

pub use client::RegistryClient;
pub use config::{RegistryConfig, TokenConfig};
pub use error::TokenError;
pub use source::RegistrySource;
pub use token::{AccessToken, ClientCredentialsTokenProvider, TokenProvider};
