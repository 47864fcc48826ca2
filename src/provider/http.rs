//! Shared HTTP plumbing for the external catalog adapters.
//!
//! Maps transport-level and status-level failures onto the typed
//! [`ProviderError`] taxonomy so every adapter classifies errors the same way.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, ProviderResult};

/// Build a reqwest client with the adapter's bounded request timeout.
pub(crate) fn build_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("failed to build HTTP client with timeout: {e}");
            reqwest::Client::new()
        })
}

/// Classify a transport-level reqwest failure.
pub(crate) fn map_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_connect() {
        ProviderError::NetworkUnavailable(err.to_string())
    } else if err.is_decode() {
        ProviderError::MalformedResponse(err.to_string())
    } else {
        ProviderError::NetworkUnavailable(err.to_string())
    }
}

/// Classify a non-success HTTP status.
pub(crate) fn map_status(status: StatusCode) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthFailure,
        StatusCode::NOT_FOUND => ProviderError::NotFound,
        other => ProviderError::NetworkUnavailable(format!("unexpected status {other}")),
    }
}

/// Check the status and decode the JSON body, classifying every failure.
///
/// Decode failures surface as [`ProviderError::MalformedResponse`]; they are
/// never collapsed into empty success.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(map_status(status));
    }
    response.json().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::MalformedResponse(e.to_string())
        }
    })
}
