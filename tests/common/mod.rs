//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use cliniccio_routes::lifecycle::startup::build_application_with_templates;
use cliniccio_routes::template::TemplateStore;
use cliniccio_routes::{AppConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const ANALYSIS_HTML: &str = "<div ng-controller=\"AnalysesCtrl\">analysis</div>";
pub const NETWORK_HTML: &str = "<div ng-controller=\"NetworkCtrl\">network</div>";

/// Templates for the default cliniccio routes.
pub fn cliniccio_templates() -> TemplateStore {
    TemplateStore::from_entries([
        ("partials/analysis.html", ANALYSIS_HTML),
        ("partials/network.html", NETWORK_HTML),
    ])
}

/// Start a server on an ephemeral loopback port.
///
/// Returns the bound address and the shutdown handle keeping it alive.
pub async fn start_server(config: AppConfig) -> (SocketAddr, Shutdown) {
    let app = build_application_with_templates(&config, cliniccio_templates()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, app);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// A client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
