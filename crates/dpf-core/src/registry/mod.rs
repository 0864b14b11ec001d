//! Schema registry
//!
//! Maps `(apiVersion, kind)` pairs to resource prototypes so that schema
//! envelopes can be turned into typed resources, and back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dpf_core::Registry;
//!
//! // Create a registry
//! let mut registry = Registry::new();
//!
//! // Register resources
//! dpf_resources::register(&mut registry);
//!
//! // Parse an envelope
//! let zone = registry.parse(br#"{"apiVersion":"zone.api.dns-platform.jp/v1","kind":"Zone","resource":{"id":"m1"}}"#)?;
//! ```
//!
//! ## Registration
//!
//! Resource crates register their prototypes during initialization:
//!
//! ```rust,ignore
//! # use dpf_core::Registry;
//!
//! // In dpf-resources
//! pub fn register(registry: &mut Registry) {
//!     registry.register(ZONE_GROUP, "Zone", Zone::default());
//! }
//! ```
//!
//! Registration takes `&mut self`; share the registry (for example in an
//! `Arc`) only once it is complete.

use crate::error::{Error, Result};
use crate::projection::Value;
use crate::traits::Spec;
use std::collections::HashMap;

/// Registry of resource prototypes keyed by group and kind
#[derive(Default)]
pub struct Registry {
    /// group -> kind -> prototype
    groups: HashMap<String, HashMap<String, Box<dyn Spec>>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut groups: Vec<_> = self.groups.iter().collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));
        let mut map = f.debug_map();
        for (group, kinds) in groups {
            let mut kinds: Vec<&String> = kinds.keys().collect();
            kinds.sort();
            map.entry(group, &kinds);
        }
        map.finish()
    }
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `prototype` under `group` and `kind`
    ///
    /// # Panics
    ///
    /// - when the pair is already registered
    /// - when the prototype reports a different group or kind than the
    ///   registration key
    ///
    /// Both are start-up mistakes that no caller can recover from.
    pub fn register<S: Spec + Clone>(&mut self, group: &str, kind: &str, prototype: S) {
        if prototype.group() != group || prototype.kind() != kind {
            panic!(
                "prototype registered as {group}/{kind} reports {}/{}",
                prototype.group(),
                prototype.kind()
            );
        }

        let kinds = self.groups.entry(group.to_string()).or_default();
        if kinds.contains_key(kind) {
            panic!("{group}/{kind} is already registered");
        }
        kinds.insert(kind.to_string(), Box::new(prototype));
        tracing::trace!(group, kind, "registered resource");
    }

    /// `true` when the pair is registered
    pub fn contains(&self, group: &str, kind: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|kinds| kinds.contains_key(kind))
    }

    /// Registered groups, sorted
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }

    /// Kinds registered in `group`, sorted
    pub fn kinds(&self, group: &str) -> Vec<&str> {
        let mut kinds: Vec<&str> = self
            .groups
            .get(group)
            .map(|kinds| kinds.keys().map(String::as_str).collect())
            .unwrap_or_default();
        kinds.sort_unstable();
        kinds
    }

    /// Fresh zero-value instance of a registered kind
    pub fn new_instance(&self, group: &str, kind: &str) -> Result<Box<dyn Spec>> {
        let kinds = self
            .groups
            .get(group)
            .ok_or_else(|| Error::UnsupportedApiVersion(group.to_string()))?;
        let prototype = kinds.get(kind).ok_or_else(|| Error::UnsupportedKind {
            api_version: group.to_string(),
            kind: kind.to_string(),
        })?;
        Ok(prototype.clone())
    }

    /// Parse a schema envelope `{"apiVersion", "kind", "resource"}`
    ///
    /// The resource is absorbed into a fresh copy of the registered
    /// prototype, then its `init()` hook runs.
    pub fn parse(&self, bytes: &[u8]) -> Result<Box<dyn Spec>> {
        let envelope: Value = serde_json::from_slice(bytes).map_err(Error::InvalidJson)?;

        let kind = envelope
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(Error::MissingKind)?;
        let api_version = envelope
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or(Error::MissingApiVersion)?;

        let mut resource = self.new_instance(api_version, kind)?;
        let payload = envelope
            .get("resource")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        resource
            .absorb_fields(payload)
            .map_err(|e| Error::ResourceParse(Box::new(e)))?;
        resource.init();

        tracing::trace!(api_version, kind, "parsed schema envelope");
        Ok(resource)
    }

    /// Encode `resource` as a schema envelope using its read projection
    ///
    /// # Errors
    ///
    /// Fails when the resource's kind is not registered.
    pub fn to_envelope(&self, resource: &dyn Spec) -> Result<Vec<u8>> {
        let (group, kind) = (resource.group(), resource.kind());
        self.new_instance(group, kind)?;

        let body = serde_json::json!({
            "apiVersion": group,
            "kind": kind,
            "resource": Value::Object(resource.project_fields(crate::FieldAction::Read)),
        });
        Ok(serde_json::to_vec(&body)?)
    }
}
