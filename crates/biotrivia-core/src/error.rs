//! Markup source error types.
//!
//! These error types represent failures when fetching raw markup for a
//! target. Defined in `biotrivia-core` so the hint loader can classify
//! errors for retry decisions without string matching.

use thiserror::Error;

/// Errors that can occur when fetching markup from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The encyclopedia has no article for the requested title.
    #[error("article not found: {0}")]
    ArticleNotFound(String),

    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl SourceError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::ArticleNotFound(_) | SourceError::MalformedResponse(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            SourceError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
