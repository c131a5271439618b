//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, concurrency limit,
//!   security headers)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers::{self, Manifest, Otherwise};
use crate::http::request::{request_id, UuidRequestId};
use crate::http::HEALTH_PATH;
use crate::lifecycle::Application;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub app: Application,
    pub manifest: Arc<Manifest>,
}

impl AppState {
    pub fn new(app: Application) -> Self {
        let manifest = Manifest {
            app: app.modules.app_name().to_string(),
            modules: app.modules.load_order().to_vec(),
            routes: app.routes.routes().cloned().collect(),
            otherwise: Otherwise {
                redirect_to: app.routes.default_redirect().to_string(),
            },
        };
        Self {
            app,
            manifest: Arc::new(manifest),
        }
    }
}

/// HTTP front end for the route table.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server for an already built application.
    pub fn new(config: AppConfig, app: Application) -> Self {
        let router = Self::build_router(&config, AppState::new(app));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut routes: Router<AppState> = Router::new().route(HEALTH_PATH, get(handlers::health));
        if config.manifest.enabled {
            routes = routes.route(&config.manifest.path, get(handlers::manifest));
        }

        let mut router = routes
            .fallback(handlers::resolve_route)
            .with_state(state)
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ));
        }

        router
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn make_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request),
    )
}
