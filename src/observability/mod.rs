//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and renderer produce:
//!     → logging.rs (structured log events, request ID attached)
//!     → metrics.rs (outcome counters, service latency)
//! ```

pub mod logging;
pub mod metrics;
