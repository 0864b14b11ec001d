//! Registry Contract Tests
//!
//! These tests verify that the schema registry:
//! 1. Rejects duplicate and mismatched registrations at start-up
//! 2. Reports envelope problems as errors, in a fixed order of checks
//! 3. Produces fresh instances equal to directly absorbed resources

mod common;

use common::{TEST_GROUP, TestKey, TestKeyList};
use dpf_core::projection::absorb_value;
use dpf_core::{Error, Registry};
use serde_json::json;

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(TEST_GROUP, "TestKey", TestKey::default());
    registry.register(TEST_GROUP, "TestKeyList", TestKeyList::default());
    registry
}

#[test]
#[should_panic(expected = "already registered")]
fn test_second_registration_of_same_kind_panics() {
    let mut registry = Registry::new();
    registry.register(TEST_GROUP, "TestKey", TestKey::default());
    registry.register(TEST_GROUP, "TestKey", TestKey::default());
}

#[test]
fn test_distinct_kinds_register_without_panicking() {
    let registry = registry();
    assert!(registry.contains(TEST_GROUP, "TestKey"));
    assert!(registry.contains(TEST_GROUP, "TestKeyList"));
}

#[test]
#[should_panic(expected = "reports")]
fn test_prototype_must_match_its_key() {
    let mut registry = Registry::new();
    registry.register(TEST_GROUP, "TestKeyList", TestKey::default());
}

#[test]
fn test_missing_api_version() {
    let err = registry().parse(br#"{"kind":"X"}"#).unwrap_err();

    assert!(matches!(err, Error::MissingApiVersion));
    assert!(err.to_string().contains("apiVersion value is not exist"));
}

#[test]
fn test_kind_is_checked_before_api_version() {
    let err = registry().parse(b"{}").unwrap_err();
    assert!(matches!(err, Error::MissingKind));

    let err = registry().parse(br#"{"kind": 3, "apiVersion": "x"}"#).unwrap_err();
    assert!(matches!(err, Error::MissingKind));
}

#[test]
fn test_unknown_group_and_kind_are_named() {
    let registry = registry();

    let err = registry
        .parse(br#"{"apiVersion":"other/v9","kind":"TestKey"}"#)
        .unwrap_err();
    assert!(matches!(&err, Error::UnsupportedApiVersion(group) if group == "other/v9"));

    let envelope = json!({"apiVersion": TEST_GROUP, "kind": "Missing"}).to_string();
    let err = registry.parse(envelope.as_bytes()).unwrap_err();
    assert!(matches!(&err, Error::UnsupportedKind { kind, .. } if kind == "Missing"));
}

#[test]
fn test_payload_mismatch_is_wrapped() {
    let envelope = json!({
        "apiVersion": TEST_GROUP,
        "kind": "TestKey",
        "resource": {"id": "not-a-number"}
    })
    .to_string();

    let err = registry().parse(envelope.as_bytes()).unwrap_err();
    match &err {
        Error::ResourceParse(inner) => {
            assert!(matches!(inner.as_ref(), Error::Field { field, .. } if field == "id"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("failed to parse resource"));
}

#[test]
fn test_parse_equals_direct_absorb() {
    let payload = json!({
        "id": 200,
        "name": "xfr-key",
        "secret": "c2VjcmV0",
        "description": "transfer key",
        "parent_id": 4
    });
    let envelope = json!({
        "apiVersion": TEST_GROUP,
        "kind": "TestKey",
        "resource": payload.clone()
    });

    let parsed = registry().parse(envelope.to_string().as_bytes()).unwrap();

    let mut direct = TestKey::default();
    absorb_value(payload, &mut direct).unwrap();
    assert_eq!(parsed.downcast_ref::<TestKey>(), Some(&direct));
}

#[test]
fn test_parse_never_hands_out_the_prototype() {
    let registry = registry();
    let envelope = json!({
        "apiVersion": TEST_GROUP,
        "kind": "TestKey",
        "resource": {"name": "first"}
    })
    .to_string();

    let mut first = registry.parse(envelope.as_bytes()).unwrap();
    first.downcast_mut::<TestKey>().unwrap().name = "changed".to_string();

    let blank = registry.new_instance(TEST_GROUP, "TestKey").unwrap();
    assert_eq!(blank.downcast_ref::<TestKey>(), Some(&TestKey::default()));

    let second = registry.parse(envelope.as_bytes()).unwrap();
    assert_eq!(second.downcast_ref::<TestKey>().unwrap().name, "first");
}

#[test]
fn test_envelope_of_list_round_trips() {
    let registry = registry();
    let list = TestKeyList {
        items: vec![TestKey {
            id: 1,
            name: "a".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let bytes = registry.to_envelope(&list).unwrap();
    let parsed = registry.parse(&bytes).unwrap();
    let parsed = parsed.downcast::<TestKeyList>().unwrap();
    assert_eq!(parsed.items, list.items);
}
