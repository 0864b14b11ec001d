//! Integration tests for the reqwest transport using wiremock
//!
//! These tests drive the client over real HTTP against a mocked API.

mod common;

use common::{TOKEN, TestKey, sync_result};
use dpf_core::{Client, ClientConfig};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    let mut config = ClientConfig::new(TOKEN);
    config.endpoint = format!("{}/dpf/v1", server.uri());
    Client::from_config(&config).expect("valid config")
}

fn key() -> TestKey {
    TestKey {
        contract_id: "f1".to_string(),
        id: 7,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_read_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dpf/v1/contracts/f1/keys/7"))
        .and(bearer_token(TOKEN))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sync_result("r1", json!({"id": 7, "name": "xfr"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut key = key();
    let request_id = client(&server).read(&mut key).await.expect("read succeeds");

    assert_eq!(request_id, "r1");
    assert_eq!(key.name, "xfr");
}

#[tokio::test]
async fn test_create_sends_projected_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dpf/v1/contracts/f1/keys"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "xfr"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "request_id": "abc",
            "jobs_url": format!("{}/dpf/v1/jobs/abc", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = TestKey {
        name: "xfr".to_string(),
        ..key()
    };
    let request_id = client(&server).create(&key, None).await.expect("accepted");
    assert_eq!(request_id, "abc");
}

#[tokio::test]
async fn test_search_keywords_reach_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dpf/v1/contracts/f1/keys"))
        .and(query_param("_keywords_name[]", "xfr"))
        .and(query_param("limit", "5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"request_id": "l1", "results": [{"id": 1}]})),
        )
        .mount(&server)
        .await;

    let mut list = common::TestKeyList {
        contract_id: "f1".to_string(),
        ..Default::default()
    };
    let params = dpf_core::SearchParams::new().keyword("name", "xfr").limit(5);
    client(&server).list(&mut list, Some(&params)).await.expect("list succeeds");

    assert_eq!(list.items.len(), 1);
}

#[tokio::test]
async fn test_error_status_is_reported_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dpf/v1/contracts/f1/keys/7"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let mut key = key();
    let err = client(&server).read(&mut key).await.unwrap_err();
    let response = err.bad_response().expect("bad response");

    assert_eq!(response.status, Some(503));
    assert_eq!(response.detail, "upstream unavailable");
    assert!(response.error_type.is_none());
    assert!(response.is_retryable());
}
