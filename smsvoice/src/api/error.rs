use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("request conflicts with resource state: {0}")]
    Conflict(String),

    #[error("request rejected by service validation: {0}")]
    Validation(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("API returned error {code}: {message}")]
    Api { code: String, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("too many requests, throttled by service")]
    Throttled,

    #[error("service unavailable, retry later")]
    ServiceUnavailable,
}

impl ApiError {
    /// True when the remote service reports the resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}
