//! Error taxonomy for rate and price resolution.
//!
//! The HTTP layer maps these to status codes; nothing here depends on the
//! transport.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Request parameters rejected before any upstream call
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Target currency absent from an otherwise valid upstream response
    #[error("unknown currency: {0}")]
    CurrencyNotFound(String),

    /// Symbol present in neither the seed table nor the coin directory
    #[error("unknown crypto symbol: {0}")]
    SymbolNotFound(String),

    /// Upstream signalled HTTP 429
    #[error("upstream rate limit exceeded")]
    RateLimited,

    /// Upstream call exceeded the configured timeout
    #[error("upstream request timed out")]
    UpstreamTimeout,

    /// Network failure, non-success status, or malformed payload
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Unexpected state
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
