//! Remote store error types.

use thiserror::Error;

/// Errors reported by a remote document store. None of these reach the
/// presentation layer; repositories treat every variant as "remote returned
/// nothing" and fall back to the local cache.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Network-level failure (connection refused, reset, DNS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered but refused the operation.
    #[error("Remote store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The addressed document does not exist.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The call did not settle within the configured timeout.
    #[error("Remote call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Failure injected by a test double.
    #[error("Remote store unavailable")]
    Unavailable,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Malformed(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}
