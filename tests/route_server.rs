//! End-to-end tests against a running server.

use std::time::Duration;

use cliniccio_routes::AppConfig;
use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_named_routes_serve_their_views() {
    let (addr, _shutdown) = common::start_server(AppConfig::default()).await;
    let client = common::client();

    let res = client.get(format!("http://{addr}/analysis")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-route-controller"], "AnalysesCtrl");
    assert_eq!(res.headers()["x-route-template"], "partials/analysis.html");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), common::ANALYSIS_HTML);

    let res = client.get(format!("http://{addr}/network")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-route-controller"], "NetworkCtrl");
    assert_eq!(res.text().await.unwrap(), common::NETWORK_HTML);
}

#[tokio::test]
async fn test_everything_else_redirects_to_network() {
    let (addr, _shutdown) = common::start_server(AppConfig::default()).await;
    let client = common::client();

    for path in ["/", "/nowhere", "/analysis/", "/network/details", "/partials/network.html"] {
        let res = client.get(format!("http://{addr}{path}")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FOUND, "path {path}");
        assert_eq!(res.headers()["location"], "/network", "path {path}");
    }
}

#[tokio::test]
async fn test_following_the_redirect_lands_on_network_view() {
    let (addr, _shutdown) = common::start_server(AppConfig::default()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("http://{addr}/unknown")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.url().path(), "/network");
    assert_eq!(res.text().await.unwrap(), common::NETWORK_HTML);
}

#[tokio::test]
async fn test_manifest_lists_route_table() {
    let (addr, _shutdown) = common::start_server(AppConfig::default()).await;

    let manifest: serde_json::Value = common::client()
        .get(format!("http://{addr}/_app/manifest"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(manifest["app"], "cliniccio");
    assert_eq!(manifest["modules"][3], "ngGrid");
    assert_eq!(manifest["modules"][5], "cliniccio");
    assert_eq!(manifest["routes"][0]["template"], "partials/analysis.html");
    assert_eq!(manifest["otherwise"]["redirect_to"], "/network");
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let (addr, shutdown) = common::start_server(AppConfig::default()).await;
    let client = common::client();

    let res = client.get(format!("http://{addr}/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = common::client();
    assert!(fresh.get(format!("http://{addr}/healthz")).send().await.is_err());
}
