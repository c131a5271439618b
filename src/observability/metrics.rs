//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_resolutions_total` (counter): resolutions by outcome and route
//! - `route_request_duration_seconds` (histogram): handler latency
//!
//! # Design Decisions
//! - Labels stay bounded: `route` is a registered path or a redirect reason,
//!   never the raw request path
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Resolution;

pub const RESOLUTIONS_TOTAL: &str = "route_resolutions_total";
pub const REQUEST_DURATION_SECONDS: &str = "route_request_duration_seconds";

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of one route resolution.
pub fn record_resolution(resolution: &Resolution<'_>, start_time: Instant) {
    match resolution {
        Resolution::Matched(route) => {
            metrics::counter!(RESOLUTIONS_TOTAL, "outcome" => "matched", "route" => route.path.clone())
                .increment(1);
        }
        Resolution::Redirect { reason, .. } => {
            metrics::counter!(RESOLUTIONS_TOTAL, "outcome" => "redirect", "route" => reason.as_str())
                .increment(1);
        }
    }
    metrics::histogram!(REQUEST_DURATION_SECONDS).record(start_time.elapsed().as_secs_f64());
}
