//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Serve the origin site (static files, SPA index fallback)
//! - Wrap it in the prerender middleware
//! - Wire up tracing, request IDs and request timeout
//! - Bind to the listener and shut down gracefully on Ctrl-C

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ProxyConfig, SiteConfig};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::prerender::{with_prerender, Prerender, PrerenderResult};

/// HTTP server for the prerender proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server for the configured static site.
    pub fn new(config: ProxyConfig) -> PrerenderResult<Self> {
        let origin = site_router(&config.site);
        Self::with_origin(config, origin)
    }

    /// Create a server in front of an arbitrary origin router.
    pub fn with_origin(config: ProxyConfig, origin: Router) -> PrerenderResult<Self> {
        let prerender = Arc::new(Prerender::new(&config.prerender)?);
        tracing::info!(
            service_url = %prerender.base_url(),
            token = config.prerender.token.is_some(),
            "Prerender service configured"
        );

        let router = Self::build_router(&config, origin, prerender);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, origin: Router, prerender: Arc<Prerender>) -> Router {
        with_prerender(origin, prerender)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, e.g. for driving it without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

}

/// Static site router: files under `root`, unknown paths get the index document.
pub fn site_router(site: &SiteConfig) -> Router {
    let root = Path::new(&site.root);
    let files = ServeDir::new(root).fallback(ServeFile::new(root.join(&site.index)));
    Router::new().fallback_service(files)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
