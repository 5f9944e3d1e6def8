use thiserror::Error;

/// Failures of the external place provider.
///
/// None of these escape the search pipeline: the external adapter logs them
/// and degrades to an empty contribution plus an advisory message.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No provider is configured, or it cannot be reached at all.
    #[error("external place search unavailable: {0}")]
    Unavailable(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ProviderError {
    /// Short user-facing message shown inline next to the result list.
    #[must_use]
    pub fn advisory(&self) -> String {
        match self {
            ProviderError::Unavailable(_) => {
                "map search is not available right now; showing saved places only".to_string()
            }
            _ => "search failed; showing saved places only".to_string(),
        }
    }
}
