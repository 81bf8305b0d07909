/// Errors that can occur while obtaining a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// A network error occurred while calling the token endpoint.
    #[error("Network error: {0}")]
    Network(String),

    /// The token endpoint returned a non-success status code.
    #[error("HTTP error: status {status}: {body}")]
    Http { status: u16, body: String },

    /// The token response could not be parsed.
    #[error("Failed to parse token response: {0}")]
    Parse(String),
}
