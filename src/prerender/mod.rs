//! Prerender subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → classifier.rs (crawler? static asset? loop marker?)
//!         false → wrapped application
//!         true  → renderer.rs (target.rs builds the service URL)
//!                     → prerender service
//!                     → transcode.rs (gzip ↔ plain for the client)
//!                 on error → wrapped application
//! ```
//!
//! # Design Decisions
//! - Classification is pure and never fails
//! - Every render failure is an `Err`, never an error page
//! - Crawler and extension tables are compile-time constants

use axum::http::HeaderName;

pub mod agents;
pub mod classifier;
pub mod error;
pub mod middleware;
pub mod renderer;
pub mod target;
pub mod transcode;

pub use classifier::{classify, should_prerender};
pub use error::{PrerenderError, PrerenderResult};
pub use middleware::{prerender_middleware, with_prerender};
pub use renderer::Prerender;
pub use transcode::Transcode;

/// Set by the prerender service on its own requests to the origin.
pub const X_PRERENDER: HeaderName = HeaderName::from_static("x-prerender");
/// Sent by Buffer's link preview bot.
pub const X_BUFFERBOT: HeaderName = HeaderName::from_static("x-bufferbot");
/// Authentication token for the prerender service.
pub const X_PRERENDER_TOKEN: HeaderName = HeaderName::from_static("x-prerender-token");
pub const CF_VISITOR: HeaderName = HeaderName::from_static("cf-visitor");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
