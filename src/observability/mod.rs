//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (route resolution counters, latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every log event
//! - Request ID flows into the HTTP span
//! - Metrics are cheap (atomic increments); no recorder installed means no-op

pub mod logging;
pub mod metrics;
