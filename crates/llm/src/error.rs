//! Provider errors

/// Errors raised while talking to a model provider.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP transport failed.
    #[error("http transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// The HTTP status code
        status: u16,
        /// The response body, as text
        body: String,
    },

    /// A stream event did not decode as a chunk.
    #[error("malformed stream event {data:?}: {source}")]
    Decode {
        /// The raw event data
        data: String,
        /// The decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// Any other provider failure.
    #[error("provider error: {0}")]
    Provider(String),
}

impl Error {
    /// Whether the error is about the stream envelope rather than
    /// the transport.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
