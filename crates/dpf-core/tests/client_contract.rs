//! Resource Client Contract Tests
//!
//! These tests verify that the client:
//! 1. Issues exactly one request per call and never retries
//! 2. Fails unsupported actions before touching the network
//! 3. Returns the request id of sync and async envelopes alike
//! 4. Reports every HTTP-level failure as a single bad-response error

mod common;

use common::{
    ENDPOINT, MockTransport, ReadOnlyNote, TOKEN, TestKey, TestKeyList, client, sync_result,
    sync_results,
};
use dpf_core::{Action, Error, Method, SearchParams};
use serde_json::json;

fn key() -> TestKey {
    TestKey {
        contract_id: "f1".to_string(),
        id: 7,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_excludes_fields_without_create_tag() {
    let transport = MockTransport::new();
    transport.push(202, json!({"request_id": "c1", "jobs_url": "https://api.test/v1/jobs/c1"}));
    let client = client(&transport);

    let key = TestKey {
        name: "xfr".to_string(),
        secret: "must-not-leak".to_string(),
        ..key()
    };
    client.create(&key, None).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, format!("{ENDPOINT}/contracts/f1/keys"));
    assert_eq!(transport.last_body(), Some(json!({"name": "xfr"})));
}

#[tokio::test]
async fn test_read_populates_read_only_field() {
    let transport = MockTransport::new();
    transport.push(
        200,
        sync_result("r1", json!({"id": 7, "name": "xfr", "secret": "c2VjcmV0"})),
    );
    let client = client(&transport);

    let mut key = key();
    let request_id = client.read(&mut key).await.unwrap();

    assert_eq!(request_id, "r1");
    assert_eq!(key.secret, "c2VjcmV0");
    assert_eq!(key.contract_id, "f1");
    assert!(transport.last_request().body.is_none());
}

#[tokio::test]
async fn test_accepted_job_returns_request_id_without_waiting() {
    let transport = MockTransport::new();
    transport.push(202, json!({"request_id": "abc", "jobs_url": ".../abc"}));
    let client = client(&transport);

    let request_id = client.delete(&key()).await.unwrap();

    assert_eq!(request_id, "abc");
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.last_request().method, Method::DELETE);
}

#[tokio::test]
async fn test_sync_mutation_envelope_is_accepted() {
    let transport = MockTransport::new();
    transport.push(200, sync_result("u1", json!({"id": 7})));
    let client = client(&transport);

    let request_id = client.update(&key(), None).await.unwrap();
    assert_eq!(request_id, "u1");
}

#[tokio::test]
async fn test_explicit_body_replaces_resource_projection() {
    let transport = MockTransport::new();
    transport.push(202, json!({"request_id": "u2"}));
    let client = client(&transport);

    let body = TestKey {
        description: "rotated".to_string(),
        ..Default::default()
    };
    client.update(&key(), Some(&body)).await.unwrap();

    assert_eq!(transport.last_request().url, format!("{ENDPOINT}/contracts/f1/keys/7"));
    assert_eq!(
        transport.last_body(),
        Some(json!({"description": "rotated", "parent_id": null}))
    );
}

#[tokio::test]
async fn test_unsupported_action_makes_no_request() {
    let transport = MockTransport::new();
    let client = client(&transport);

    let err = client.apply(&key(), None).await.unwrap_err();
    assert!(matches!(
        &err,
        Error::UnsupportedAction { kind, action: Action::Apply } if kind == "TestKey"
    ));

    let mut note = ReadOnlyNote::default();
    let err = client.read(&mut note).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedAction { .. }), "empty path is unsupported");

    let mut unbound = TestKey::default();
    assert!(client.read(&mut unbound).await.is_err());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_error_body_is_carried_in_bad_response() {
    let transport = MockTransport::new();
    transport.push(
        400,
        json!({
            "request_id": "e1",
            "error_type": "ParameterError",
            "error_message": "JSON parse error occurred.",
            "error_details": [{"code": "invalid", "attribute": "name"}]
        }),
    );
    let client = client(&transport);

    let err = client.create(&key(), None).await.unwrap_err();
    let response = err.bad_response().expect("bad response");

    assert_eq!(response.method, "POST");
    assert_eq!(response.path, "/contracts/f1/keys");
    assert_eq!(response.status, Some(400));
    assert_eq!(response.request_id.as_deref(), Some("e1"));
    assert_eq!(response.error_type.as_deref(), Some("ParameterError"));
    assert_eq!(response.error_details[0].attribute, "name");
    assert!(!response.is_retryable());
    assert_eq!(transport.calls(), 1, "no retry after a failure");
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    let transport = MockTransport::new();
    transport.push_failure("connection reset");
    let client = client(&transport);

    let mut key = key();
    let err = client.read(&mut key).await.unwrap_err();
    let response = err.bad_response().expect("bad response");

    assert_eq!(response.status, None);
    assert!(response.detail.contains("connection reset"));
    assert!(err.to_string().contains("GET /contracts/f1/keys/7"));
}

#[tokio::test]
async fn test_undecodable_body_is_a_bad_response() {
    let transport = MockTransport::new();
    transport.push_raw(200, "<html>maintenance</html>");
    transport.push(200, json!({"request_id": "r2"}));
    let client = client(&transport);

    let mut key = key();
    let err = client.read(&mut key).await.unwrap_err();
    assert_eq!(err.bad_response().unwrap().status, Some(200));

    let err = client.read(&mut key).await.unwrap_err();
    assert!(err.to_string().contains("no `result`"));
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let transport = MockTransport::new();
    transport.push(202, json!({"request_id": "c2"}));
    let client = client(&transport);

    client.create(&key(), None).await.unwrap();
    let request = transport.last_request();

    assert_eq!(request.header("authorization"), Some(format!("Bearer {TOKEN}").as_str()));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(!format!("{request:?}").contains(TOKEN));
}

#[tokio::test]
async fn test_list_prepares_items_and_encodes_search() {
    let transport = MockTransport::new();
    transport.push(
        200,
        sync_results("l1", vec![json!({"id": 1, "name": "a"}), json!({"id": 2, "name": "b"})]),
    );
    let client = client(&transport);

    let mut list = TestKeyList {
        contract_id: "f1".to_string(),
        ..Default::default()
    };
    let params = SearchParams::new().keyword("name", "a").limit(10);
    let request_id = client.list(&mut list, Some(&params)).await.unwrap();

    assert_eq!(request_id, "l1");
    assert_eq!(list.items.len(), 2);
    assert!(list.items.iter().all(|item| item.contract_id == "f1"));
    assert_eq!(
        transport.last_request().url,
        format!("{ENDPOINT}/contracts/f1/keys?_keywords_name%5B%5D=a&limit=10")
    );
}

#[tokio::test]
async fn test_count_sets_count() {
    let transport = MockTransport::new();
    transport.push(200, sync_result("n1", json!({"count": 42})));
    let client = client(&transport);

    let mut list = TestKeyList {
        contract_id: "f1".to_string(),
        ..Default::default()
    };
    let params = SearchParams::new().offset(5).limit(5);
    client.count(&mut list, Some(&params)).await.unwrap();

    assert_eq!(list.count, 42);
    assert_eq!(
        transport.last_request().url,
        format!("{ENDPOINT}/contracts/f1/keys/count"),
        "count ignores paging"
    );
}

#[tokio::test]
async fn test_list_all_pages_through_count() {
    let transport = MockTransport::new();
    transport.push(200, sync_result("n1", json!({"count": 3})));
    transport.push(
        200,
        sync_results("p1", vec![json!({"id": 1}), json!({"id": 2})]),
    );
    transport.push(200, sync_results("p2", vec![json!({"id": 3})]));
    let client = client(&transport);

    let mut list = TestKeyList {
        contract_id: "f1".to_string(),
        ..Default::default()
    };
    let request_id = client.list_all(&mut list, None).await.unwrap();

    assert_eq!(request_id, "p2");
    assert_eq!(transport.calls(), 3);
    let ids: Vec<i64> = list.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(list.count, 3);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls[1], format!("{ENDPOINT}/contracts/f1/keys?offset=0&limit=2"));
    assert_eq!(urls[2], format!("{ENDPOINT}/contracts/f1/keys?offset=2&limit=2"));
}

#[tokio::test]
async fn test_list_all_of_empty_collection_only_counts() {
    let transport = MockTransport::new();
    transport.push(200, sync_result("n0", json!({"count": 0})));
    let client = client(&transport);

    let mut list = TestKeyList {
        contract_id: "f1".to_string(),
        items: vec![TestKey::default()],
        ..Default::default()
    };
    let request_id = client.list_all(&mut list, None).await.unwrap();

    assert_eq!(request_id, "n0");
    assert!(list.items.is_empty());
    assert_eq!(transport.calls(), 1);
}
