//! Fetcher error type for retry classification.

/// Error returned by a Fetcher call (metadata extraction or download).
/// Used so we can classify and decide retries before converting to an outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network or extractor hiccup (yt-dlp reported an error). Retried.
    #[error("{0}")]
    Transient(String),
    /// Environment or programming error (binary missing, bad output). Not retried.
    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn message(&self) -> &str {
        match self {
            FetchError::Transient(m) | FetchError::Unexpected(m) => m,
        }
    }
}
