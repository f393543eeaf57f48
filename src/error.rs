//! Muninn error types

use std::time::Duration;

/// Muninn error types
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    // Request validation errors — detected before any external call is made
    #[error("invalid request: {0}")]
    Validation(String),

    // Gateway/transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("gateway timeout")]
    Timeout,

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    /// Upstream answered 2xx but the body did not match the documented shape.
    #[error("invalid response from service: {0}")]
    InvalidResponse(String),

    // Model-output errors
    #[error("unparseable model output: {0}")]
    Parse(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("no gateway configured")]
    NoGateway,

    #[error("configuration error: {0}")]
    Configuration(String),

    // Report artifact storage
    #[error("storage error: {0}")]
    Storage(String),
}

impl MuninnError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Transport-level failures (timeouts, rate limits, upstream outages)
    /// are transient; everything else is permanent for this request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MuninnError::Timeout
                | MuninnError::RateLimited { .. }
                | MuninnError::Unavailable(_)
                | MuninnError::Http(_)
        )
    }

    /// Provider-suggested retry delay, when one was given.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MuninnError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for Muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
