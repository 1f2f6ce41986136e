//! End-to-end tests: a real listener in front of a mocked upstream.

use std::net::SocketAddr;
use std::sync::Once;

use notion_engine::{FetchSettings, NotionProxy, UpstreamSettings};
use notion_proxy::build_router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(proxy_logging::initialize_for_tests);
}

/// Start the proxy on a random port, pointed at `upstream`.
async fn start_proxy(upstream: &MockServer) -> SocketAddr {
    let settings = UpstreamSettings {
        api_base_url: upstream.uri(),
        ..UpstreamSettings::default()
    };
    let proxy = NotionProxy::with_reqwest(FetchSettings::default(), settings).unwrap();
    let app = build_router(proxy, "/notion");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn mount_legacy_listing(upstream: &MockServer, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path("/databases/db1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "nope" })))
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/databases/db1/query"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(upstream)
        .await;
}

async fn post(addr: SocketAddr, body: &str) -> (u16, Option<String>, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/notion"))
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let text = response.text().await.unwrap();
    (status, allow_origin, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn post_returns_results_with_cors_header() {
    init_logging();
    let upstream = MockServer::start().await;
    mount_legacy_listing(
        &upstream,
        200,
        json!({ "results": [{ "id": "a" }], "has_more": false, "next_cursor": null }),
    )
    .await;
    let addr = start_proxy(&upstream).await;

    let (status, allow_origin, body) =
        post(addr, r#"{ "token": "secret_t", "dbId": "db1" }"#).await;
    assert_eq!(status, 200);
    assert_eq!(allow_origin.as_deref(), Some("*"));
    assert_eq!(body, json!({ "results": [{ "id": "a" }] }));
}

#[tokio::test]
async fn upstream_failure_becomes_500_with_message() {
    init_logging();
    let upstream = MockServer::start().await;
    mount_legacy_listing(
        &upstream,
        401,
        json!({ "object": "error", "code": "unauthorized", "message": "API token is invalid." }),
    )
    .await;
    let addr = start_proxy(&upstream).await;

    let (status, allow_origin, body) =
        post(addr, r#"{ "token": "secret_bad", "dbId": "db1", "fetchBlocks": true }"#).await;
    assert_eq!(status, 500);
    assert_eq!(allow_origin.as_deref(), Some("*"));
    assert_eq!(body, json!({ "message": "API token is invalid." }));
}

#[tokio::test]
async fn unparseable_body_becomes_500() {
    init_logging();
    let upstream = MockServer::start().await;
    let addr = start_proxy(&upstream).await;

    let (status, _, body) = post(addr, r#"{ "dbId": "db1" }"#).await;
    assert_eq!(status, 500);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("token"), "unexpected message: {message}");
}

#[tokio::test]
async fn options_preflight_is_empty_200() {
    init_logging();
    let upstream = MockServer::start().await;
    let addr = start_proxy(&upstream).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/notion"))
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn bare_options_is_empty_200() {
    init_logging();
    let upstream = MockServer::start().await;
    let addr = start_proxy(&upstream).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/notion"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert!(response.text().await.unwrap().is_empty());
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    init_logging();
    let upstream = MockServer::start().await;
    let addr = start_proxy(&upstream).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/notion"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
}
