use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain one snapshot. Never propagated out of the polling
/// loops; consumed there and answered with a delayed retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(StatusCode),

    #[error("Snapshot decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
