//! Test doubles and common utilities for contract tests
//!
//! This module provides a scripted transport and a handful of minimal
//! resources that exercise the core without any real API.

#![allow(dead_code)]

use async_trait::async_trait;
use dpf_core::{
    Action, Client, CountableListSpec, HttpRequest, HttpResponse, ListSpec, Method,
    NullablePositiveInt64, Progress, Spec, Transport, TransportError, Watchable, fields,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ENDPOINT: &str = "https://api.test/v1";
pub const TOKEN: &str = "test-token";
pub const TEST_GROUP: &str = "test.api.dns-platform.jp/v1";

/// One scripted exchange
enum Scripted {
    Response {
        delay: Option<Duration>,
        response: HttpResponse,
    },
    Failure(String),
}

/// A transport that replays scripted responses in order
///
/// Once the script is exhausted every call gets a 500.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    /// Create a new mock with an empty script
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with a JSON body
    pub fn push(&self, status: u16, body: Value) {
        self.push_raw(status, body.to_string());
    }

    /// Queue a response with a raw body
    pub fn push_raw(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.script.lock().unwrap().push_back(Scripted::Response {
            delay: None,
            response: HttpResponse::new(status, body),
        });
    }

    /// Queue a response that takes `delay` to arrive
    pub fn push_delayed(&self, delay: Duration, status: u16, body: Value) {
        self.script.lock().unwrap().push_back(Scripted::Response {
            delay: Some(delay),
            response: HttpResponse::new(status, body.to_string()),
        });
    }

    /// Queue a transport failure
    pub fn push_failure(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.to_string()));
    }

    /// Number of calls to `execute()`
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was made")
    }

    /// JSON body of the most recent request
    pub fn last_body(&self) -> Option<Value> {
        self.last_request()
            .body
            .map(|body| serde_json::from_slice(&body).expect("request body is JSON"))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Response { delay, response }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            Some(Scripted::Failure(message)) => Err(TransportError::new(message)),
            None => Ok(HttpResponse::new(500, r#"{"error_type":"Unscripted"}"#)),
        }
    }
}

/// Client over `transport`
pub fn client(transport: &Arc<MockTransport>) -> Client {
    Client::new(ENDPOINT, TOKEN, transport.clone())
}

/// A TSIG-like resource with a string and an integer identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestKey {
    pub contract_id: String,
    pub id: i64,
    pub name: String,
    pub secret: String,
    pub description: String,
    pub parent_id: NullablePositiveInt64,
}

fields! {
    TestKey {
        contract_id: [],
        id: [Read("id")],
        name: [Read("name"), Create("name"), Update("name", omitempty)],
        secret: [Read("secret")],
        description: [
            Read("description"),
            Create("description", omitempty),
            Update("description", omitempty)
        ],
        parent_id: [Read("parent_id"), Update("parent_id", omitempty)],
    }
    identifiers: [contract_id, id]
}

impl Spec for TestKey {
    fn group(&self) -> &'static str {
        TEST_GROUP
    }

    fn kind(&self) -> &'static str {
        "TestKey"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.contract_id.is_empty() {
            return None;
        }
        let collection = format!("/contracts/{}/keys", self.contract_id);
        match action {
            Action::Create => Some((Method::POST, collection)),
            Action::Read => Some((Method::GET, format!("{collection}/{}", self.id))),
            Action::Update => Some((Method::PATCH, format!("{collection}/{}", self.id))),
            Action::Delete => Some((Method::DELETE, format!("{collection}/{}", self.id))),
            _ => None,
        }
    }
}

/// A countable list of [`TestKey`] with a tiny page size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestKeyList {
    pub contract_id: String,
    pub items: Vec<TestKey>,
    pub count: u64,
}

fields! {
    TestKeyList {
        contract_id: [],
        items: [Read("items")],
    }
    identifiers: [contract_id]
}

impl Spec for TestKeyList {
    fn group(&self) -> &'static str {
        TEST_GROUP
    }

    fn kind(&self) -> &'static str {
        "TestKeyList"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        let collection = format!("/contracts/{}/keys", self.contract_id);
        match action {
            Action::List => Some((Method::GET, collection)),
            Action::Count => Some((Method::GET, format!("{collection}/count"))),
            _ => None,
        }
    }
}

impl ListSpec for TestKeyList {
    type Item = TestKey;

    fn items(&self) -> &[TestKey] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<TestKey> {
        &mut self.items
    }

    fn prepare_item(&self, item: &mut TestKey) {
        item.contract_id.clone_from(&self.contract_id);
    }
}

impl CountableListSpec for TestKeyList {
    fn max_limit(&self) -> u64 {
        2
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn set_count(&mut self, count: u64) {
        self.count = count;
    }
}

impl Watchable for TestKeyList {
    fn progress(&self) -> Progress {
        if self.items.iter().all(|key| !key.secret.is_empty()) {
            Progress::Succeeded
        } else {
            Progress::Pending
        }
    }
}

/// A resource that supports no action at all
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyNote {
    pub text: String,
}

fields! {
    ReadOnlyNote {
        text: [Read("text")],
    }
}

impl Spec for ReadOnlyNote {
    fn group(&self) -> &'static str {
        TEST_GROUP
    }

    fn kind(&self) -> &'static str {
        "ReadOnlyNote"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        match action {
            Action::Read => Some((Method::GET, String::new())),
            _ => None,
        }
    }
}

/// Sync envelope around `result`
pub fn sync_result(request_id: &str, result: Value) -> Value {
    serde_json::json!({ "request_id": request_id, "result": result })
}

/// Sync envelope around `results`
pub fn sync_results(request_id: &str, results: Vec<Value>) -> Value {
    serde_json::json!({ "request_id": request_id, "results": results })
}

/// Job payload with the given status
pub fn job(request_id: &str, status: &str) -> Value {
    sync_result(
        request_id,
        serde_json::json!({
            "request_id": request_id,
            "status": status,
            "resources_url": format!("{ENDPOINT}/zones/m1"),
            "error_type": if status == "FAILED" { "ParameterError" } else { "" },
            "error_message": if status == "FAILED" { "bad record" } else { "" },
        }),
    )
}
