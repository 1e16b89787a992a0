//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file. Every
//! section has defaults so an empty file (or no file) is a valid config.

use serde::{Deserialize, Serialize};

/// Public prerender service used when nothing else is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://service.prerender.io/";

/// Root configuration for the prerender proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Prerender service settings.
    pub prerender: PrerenderConfig,

    /// Site served by the bundled origin.
    pub site: SiteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Prerender service configuration. Immutable once loaded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// Base URL of the prerender service.
    pub service_url: String,

    /// Token sent as `X-Prerender-Token`, if any.
    pub token: Option<String>,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            token: None,
        }
    }
}

/// Static site served behind the middleware.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory with the site's files.
    pub root: String,

    /// Document served for paths with no matching file (SPA fallback).
    pub index: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
            index: "index.html".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds, prerender call included.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.prerender.service_url, DEFAULT_SERVICE_URL);
        assert!(config.prerender.token.is_none());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [prerender]
            service_url = "http://localhost:3000/"
            token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.prerender.service_url, "http://localhost:3000/");
        assert_eq!(config.prerender.token.as_deref(), Some("secret"));
        assert_eq!(config.site.index, "index.html");
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
