//! Prerender service client.
//!
//! # Responsibilities
//! - Build the outbound GET to the prerender service
//! - Reject service-side failures (500-511) so the caller can fall back
//! - Relay status, content type and body, transcoding gzip as needed
//!
//! # Design Decisions
//! - Stateless per call; only immutable config and the pooled client are shared
//! - No retries: one failure means the origin serves the request
//! - The service response body is owned by the returned body stream and is
//!   released when that stream finishes or is dropped

use std::time::Instant;

use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header, request::Parts};
use axum::response::Response;
use url::Url;

use super::error::{PrerenderError, PrerenderResult};
use super::target::{build_api_url, normalize_base};
use super::transcode::Transcode;
use super::X_PRERENDER_TOKEN;
use crate::config::PrerenderConfig;
use crate::observability::metrics;

/// Headers copied verbatim from the inbound request to the service.
const FORWARDED_HEADERS: [header::HeaderName; 2] = [header::USER_AGENT, header::CONTENT_TYPE];

/// Client for the external prerender service.
#[derive(Debug, Clone)]
pub struct Prerender {
    base: Url,
    token: Option<HeaderValue>,
    client: reqwest::Client,
}

impl Prerender {
    /// Create a renderer with a default `reqwest` client.
    pub fn new(config: &PrerenderConfig) -> PrerenderResult<Self> {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a renderer using the given client (shared connection pool).
    pub fn with_client(config: &PrerenderConfig, client: reqwest::Client) -> PrerenderResult<Self> {
        let base: Url = config
            .service_url
            .parse()
            .map_err(|source| PrerenderError::InvalidServiceUrl {
                url: config.service_url.clone(),
                source,
            })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(PrerenderError::UnsupportedScheme(base.scheme().to_string()));
        }

        let token = match config.token.as_deref().filter(|t| !t.is_empty()) {
            Some(t) => Some(HeaderValue::from_str(t).map_err(|_| PrerenderError::InvalidToken)?),
            None => None,
        };

        Ok(Self {
            base: normalize_base(base),
            token,
            client,
        })
    }

    /// Service base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Full service URL for a request with the given headers and URI.
    pub fn api_url(&self, headers: &HeaderMap, uri: &Uri) -> String {
        build_api_url(&self.base, headers, uri)
    }

    /// Fetch the prerendered page for the request head `req` and turn it into
    /// a client response.
    ///
    /// The caller keeps the request body, so it can still hand the request to
    /// the origin on `Err`.
    pub async fn render(&self, req: &Parts) -> PrerenderResult<Response> {
        let target = self.api_url(&req.headers, &req.uri);
        let url = Url::parse(&target).map_err(|source| PrerenderError::InvalidTarget {
            url: target.clone(),
            source,
        })?;

        let mut outbound = self
            .client
            .get(url)
            .header(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        if let Some(token) = &self.token {
            outbound = outbound.header(&X_PRERENDER_TOKEN, token.clone());
        }
        for name in FORWARDED_HEADERS {
            if let Some(value) = req.headers.get(&name) {
                outbound = outbound.header(name, value.clone());
            }
        }

        tracing::debug!(url = %target, "Requesting prerendered page");
        let started = Instant::now();
        let backend = match outbound.send().await {
            Ok(backend) => backend,
            Err(e) => {
                metrics::record_backend(None, started);
                return Err(e.into());
            }
        };
        let status = backend.status();
        metrics::record_backend(Some(status.as_u16()), started);

        if is_service_failure(status) {
            return Err(PrerenderError::BackendStatus(status));
        }

        let mode = Transcode::select(&req.headers, backend.headers());
        let content_type = backend.headers().get(header::CONTENT_TYPE).cloned();
        let content_encoding = mode.content_encoding(backend.headers());

        tracing::debug!(
            url = %target,
            status = %status,
            transcode = ?mode,
            "Relaying prerendered page"
        );

        let mut response = Response::new(mode.body(backend.bytes_stream()));
        *response.status_mut() = status;
        let headers = response.headers_mut();
        if let Some(value) = content_type {
            headers.insert(header::CONTENT_TYPE, value);
        }
        if let Some(value) = content_encoding {
            headers.insert(header::CONTENT_ENCODING, value);
        }
        Ok(response)
    }
}

/// Service statuses that trigger a fallback instead of being relayed.
pub fn is_service_failure(status: StatusCode) -> bool {
    (500..=511).contains(&status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, token: Option<&str>) -> PrerenderConfig {
        PrerenderConfig {
            service_url: url.to_string(),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_service_failure_range() {
        assert!(is_service_failure(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_service_failure(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_service_failure(StatusCode::NETWORK_AUTHENTICATION_REQUIRED));
        assert!(!is_service_failure(StatusCode::OK));
        assert!(!is_service_failure(StatusCode::NOT_FOUND));
        assert!(!is_service_failure(StatusCode::from_u16(599).unwrap()));
    }

    #[test]
    fn test_new_normalizes_base() {
        let prerender = Prerender::new(&config("http://localhost:3000/render", None)).unwrap();
        assert_eq!(prerender.base_url().as_str(), "http://localhost:3000/render/");
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(matches!(
            Prerender::new(&config("not a url", None)),
            Err(PrerenderError::InvalidServiceUrl { .. })
        ));
        assert!(matches!(
            Prerender::new(&config("ftp://prerender.local/", None)),
            Err(PrerenderError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            Prerender::new(&config("http://localhost:3000/", Some("bad\ntoken"))),
            Err(PrerenderError::InvalidToken)
        ));
    }

    #[test]
    fn test_empty_token_is_absent() {
        let prerender = Prerender::new(&config("http://localhost:3000/", Some(""))).unwrap();
        assert!(prerender.token.is_none());
    }

    #[test]
    fn test_target_url_is_normalized() {
        let prerender = Prerender::new(&config("http://svc", None)).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));
        let uri: Uri = "/a/../secret/./x?q='v'".parse().unwrap();

        let target = prerender.api_url(&headers, &uri);
        assert_eq!(target, "http://svc/http://example.com/a/../secret/./x?q='v'");
        // What goes on the wire after URL parsing.
        assert_eq!(
            Url::parse(&target).unwrap().as_str(),
            "http://svc/http://example.com/secret/x?q=%27v%27"
        );
    }

    #[test]
    fn test_api_url() {
        let prerender = Prerender::new(&config("http://localhost:3000", None)).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));
        let uri: Uri = "/blog/post?id=7".parse().unwrap();

        assert_eq!(
            prerender.api_url(&headers, &uri),
            "http://localhost:3000/http://example.com/blog/post?id=7"
        );
    }
}
