use std::time::Duration;

use notion_engine::{
    negotiate, Convention, FetchSettings, ReqwestTransport, UpstreamSettings,
    CURRENT_NOTION_VERSION, LEGACY_NOTION_VERSION,
};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> UpstreamSettings {
    UpstreamSettings {
        api_base_url: format!("{}/", server.uri()),
        ..UpstreamSettings::default()
    }
}

fn version_header(endpoint: &notion_engine::NegotiatedEndpoint) -> Option<&str> {
    endpoint
        .headers()
        .iter()
        .find(|(name, _)| name == "Notion-Version")
        .map(|(_, value)| value.as_str())
}

#[tokio::test]
async fn data_source_convention_when_probe_lists_sources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/databases/db1"))
        .and(header("Notion-Version", CURRENT_NOTION_VERSION))
        .and(header("Authorization", "Bearer secret_t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "database",
            "id": "db1",
            "data_sources": [{ "id": "ds-1", "name": "Main" }, { "id": "ds-2", "name": "Other" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server);
    let transport = ReqwestTransport::new(FetchSettings::default()).unwrap();
    let endpoint = negotiate(&transport, &settings, "secret_t", "db1").await;

    assert_eq!(endpoint.convention(), Convention::DataSource);
    assert_eq!(endpoint.query_method(), &Method::PATCH);
    assert_eq!(
        endpoint.query_url(),
        format!("{}/data_sources/ds-1/query", server.uri())
    );
    assert_eq!(version_header(&endpoint), Some(CURRENT_NOTION_VERSION));
}

#[tokio::test]
async fn legacy_convention_when_probe_lists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/databases/db1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "database",
            "id": "db1",
            "data_sources": []
        })))
        .mount(&server)
        .await;

    let settings = settings(&server);
    let transport = ReqwestTransport::new(FetchSettings::default()).unwrap();
    let endpoint = negotiate(&transport, &settings, "secret_t", "db1").await;

    assert_eq!(endpoint.convention(), Convention::Legacy);
    assert_eq!(endpoint.query_method(), &Method::POST);
    assert_eq!(
        endpoint.query_url(),
        format!("{}/databases/db1/query", server.uri())
    );
    assert_eq!(version_header(&endpoint), Some(LEGACY_NOTION_VERSION));
}

#[tokio::test]
async fn legacy_convention_when_probe_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/databases/db1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "object": "error",
            "code": "validation_error",
            "message": "Invalid request"
        })))
        .mount(&server)
        .await;

    let settings = settings(&server);
    let transport = ReqwestTransport::new(FetchSettings::default()).unwrap();
    let endpoint = negotiate(&transport, &settings, "secret_t", "db1").await;
    assert_eq!(endpoint.convention(), Convention::Legacy);
}

#[tokio::test]
async fn legacy_convention_when_probe_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/databases/db1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "data_sources": [{ "id": "ds-1" }] })),
        )
        .mount(&server)
        .await;

    let settings = UpstreamSettings {
        probe_timeout: Duration::from_millis(50),
        ..settings(&server)
    };
    let transport = ReqwestTransport::new(FetchSettings::default()).unwrap();
    let endpoint = negotiate(&transport, &settings, "secret_t", "db1").await;
    assert_eq!(endpoint.convention(), Convention::Legacy);
}

#[tokio::test]
async fn legacy_convention_when_source_has_no_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/databases/db1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data_sources": [{ "name": "x" }] })),
        )
        .mount(&server)
        .await;

    let settings = settings(&server);
    let transport = ReqwestTransport::new(FetchSettings::default()).unwrap();
    let endpoint = negotiate(&transport, &settings, "secret_t", "db1").await;
    assert_eq!(endpoint.convention(), Convention::Legacy);
}
