//! Request handlers.
//!
//! # Responsibilities
//! - Resolve the request path against the route table
//! - Serve the health and manifest endpoints

use std::time::Instant;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{Resolution, Route};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Application manifest: module load order and the route table.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub app: String,
    pub modules: Vec<String>,
    pub routes: Vec<Route>,
    pub otherwise: Otherwise,
}

#[derive(Debug, Clone, Serialize)]
pub struct Otherwise {
    pub redirect_to: String,
}

/// Resolve any path that is not a reserved endpoint.
pub async fn resolve_route(State(state): State<AppState>, uri: Uri) -> Response {
    let start_time = Instant::now();
    let path = uri.path();
    let resolution = state.app.routes.resolve(path);

    let response = match resolution {
        Resolution::Matched(route) => match state.app.templates.get(&route.template) {
            Some(body) => {
                tracing::debug!(
                    path = %path,
                    controller = %route.controller,
                    template = %route.template,
                    "Route matched"
                );
                response::view(route, body.clone())
            }
            None => {
                // Startup loads every routed template, so this is a bug.
                tracing::error!(path = %path, template = %route.template, "Template missing from store");
                (StatusCode::INTERNAL_SERVER_ERROR, "Template unavailable").into_response()
            }
        },
        Resolution::Redirect { to, reason } => {
            tracing::debug!(path = %path, redirect_to = %to, reason = reason.as_str(), "Redirecting");
            response::redirect(to, uri.query())
        }
    };

    metrics::record_resolution(&resolution, start_time);
    response
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn manifest(State(state): State<AppState>) -> Json<Manifest> {
    Json(state.manifest.as_ref().clone())
}
