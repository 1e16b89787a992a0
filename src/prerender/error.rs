//! Prerender error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while setting up or performing a prerender request.
///
/// None of these reach the client: the middleware logs them and serves the
/// wrapped application instead.
#[derive(Debug, Error)]
pub enum PrerenderError {
    /// Configured service URL does not parse.
    #[error("invalid prerender service URL '{url}': {source}")]
    InvalidServiceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Configured service URL is not http(s).
    #[error("prerender service URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    /// Token cannot be sent as a header value.
    #[error("prerender token is not a valid header value")]
    InvalidToken,

    /// Composed target URL for a request is malformed.
    #[error("invalid prerender target '{url}': {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, DNS or timeout failure talking to the service.
    #[error("prerender service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a 500-511 status.
    #[error("prerender service returned {0}")]
    BackendStatus(StatusCode),

    /// Compressing or decompressing the body failed.
    #[error("prerender body transcoding failed: {0}")]
    Transcode(#[source] std::io::Error),
}

impl PrerenderError {
    /// Short label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            PrerenderError::InvalidServiceUrl { .. }
            | PrerenderError::UnsupportedScheme(_)
            | PrerenderError::InvalidToken => "config",
            PrerenderError::InvalidTarget { .. } => "target",
            PrerenderError::Transport(_) => "transport",
            PrerenderError::BackendStatus(_) => "backend_status",
            PrerenderError::Transcode(_) => "transcode",
        }
    }
}

/// Result type for prerender operations.
pub type PrerenderResult<T> = Result<T, PrerenderError>;
