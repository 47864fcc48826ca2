//! Typed failure taxonomy for provider adapters.
//!
//! Adapter failures are always captured as [`ProviderError`] values and carried
//! through the aggregation pipeline; they never propagate as panics and one
//! provider's failure never aborts the overall query.

use serde::Serialize;

/// A terminal failure from a single provider adapter.
///
/// Every provider-specific error signal (HTTP status, connect failure, decode
/// failure) is mapped onto one of these variants at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProviderError {
    /// The provider rejected the request due to rate limiting (e.g. HTTP 429).
    #[error("provider rate limited the request")]
    RateLimited,

    /// Credentials were missing, invalid, or expired (HTTP 401/403).
    #[error("provider authentication failed")]
    AuthFailure,

    /// The provider endpoint or requested resource does not exist (HTTP 404).
    #[error("provider resource not found")]
    NotFound,

    /// The request exceeded the adapter's bounded timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The provider answered but the payload could not be decoded.
    ///
    /// Malformed payloads are never silently collapsed into empty success;
    /// they always surface as this variant.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The provider could not be reached at all (DNS, connect, TLS).
    #[error("provider network unavailable: {0}")]
    NetworkUnavailable(String),
}

/// Result alias used by every provider adapter.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
