use thiserror::Error;

/// Errors raised while setting up a client.
///
/// Failures of individual calls are reported as
/// [`BackendError`][resolution_core::BackendError].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
    #[error("base URL cannot hold a path: {0}")]
    InvalidBaseUrl(String),
}
