//! Prerender proxy library.
//!
//! Axum middleware that answers crawler requests with pages fetched from a
//! prerender service and lets everything else through to the wrapped app.

pub mod config;
pub mod http;
pub mod observability;
pub mod prerender;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use prerender::{should_prerender, with_prerender, Prerender, PrerenderError};
