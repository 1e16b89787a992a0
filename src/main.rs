//! Prerender proxy server.
//!
//! Serves a static site and hands crawler requests to a prerender service.
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id ─▶ trace ─▶ timeout ─▶ prerender middleware
//!                                                           │          │
//!                                               crawler     │          │ everyone else,
//!                                                           ▼          │ or on failure
//!                                                  prerender service   ▼
//!                                                   (gzip transcode)  static site
//! ```
//!
//! Configuration comes from an optional TOML file (`--config`) and the
//! `PRERENDER_SERVICE_URL`, `PRERENDER_TOKEN` and `PORT` environment variables.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use prerender_proxy::config;
use prerender_proxy::observability::{logging, metrics};
use prerender_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "prerender-proxy")]
#[command(about = "Serve a site and prerendered pages to crawlers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("prerender-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        site_root = %config.site.root,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
