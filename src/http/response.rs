//! Response construction.
//!
//! # Responsibilities
//! - Build the view response for a matched route
//! - Build redirect responses that keep the query string
//!
//! # Design Decisions
//! - Views are `text/html` with the controller and template named in headers
//! - Redirects are `302 Found`, matching a client-side router's soft redirect
//! - Header construction failures become 500, never a panic

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::routing::Route;

pub const X_ROUTE_CONTROLLER: HeaderName = HeaderName::from_static("x-route-controller");
pub const X_ROUTE_TEMPLATE: HeaderName = HeaderName::from_static("x-route-template");

/// Serve `body` as the view for `route`.
pub fn view(route: &Route, body: Bytes) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(X_ROUTE_CONTROLLER, route.controller.as_str())
        .header(X_ROUTE_TEMPLATE, route.template.as_str())
        .body(Body::from(body))
        .unwrap_or_else(|e| internal_error(&e))
}

/// Redirect to `target`, carrying over `query` if present.
pub fn redirect(target: &str, query: Option<&str>) -> Response {
    let location = match query {
        Some(q) if !q.is_empty() => format!("{target}?{q}"),
        _ => target.to_string(),
    };

    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .unwrap_or_else(|e| internal_error(&e))
}

fn internal_error(error: &axum::http::Error) -> Response {
    tracing::error!(error = %error, "Failed to build response");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
