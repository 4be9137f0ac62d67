//! Classify fetcher errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Classify a fetcher error into an ErrorKind.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Transient(_) => ErrorKind::Transient,
        FetchError::Unexpected(_) => ErrorKind::Other,
    }
}
