use std::fmt;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of a failed lookup.
///
/// `NotFound` is not an error kind: a missing subject is an expected outcome
/// and is carried by [`crate::LookupResult::NotFound`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The upstream registry rejected the query as malformed.
    BadRequest,
    /// Any other failure: transport, credentials, unparseable payloads,
    /// unauthenticated or unrecognized upstream error codes.
    Generic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad request"),
            Self::Generic => write!(f, "generic error"),
        }
    }
}

/// Error carried by a failed lookup.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct LookupError {
    pub kind: ErrorKind,
    pub message: String,
    /// Upstream error code, when the registry supplied one.
    pub code: Option<String>,
    #[source]
    pub source: Option<BoxError>,
}

impl LookupError {
    /// Create a new error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Create a new Generic error
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    /// Create a new BadRequest error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Attach the upstream error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}
