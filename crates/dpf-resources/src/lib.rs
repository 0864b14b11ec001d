// # DNS Platform Resources
//
// This crate declares the API resources of the DNS platform on top of
// `dpf-core`.
//
// Every resource is plain data:
//
// - a struct with its wire fields
// - a `fields!` table naming, per action, which fields travel and how
// - a `Spec` impl reporting its group, kind and routes
//
// ## Resource Groups
//
// - `core.api.dns-platform.jp/v1`: contracts, common configs, TSIG keys, jobs
// - `zones.api.dns-platform.jp/v1`: zones, staged zone changes, records
//
// ## Usage
//
// ```rust,ignore
// use dpf_core::Registry;
//
// let mut registry = Registry::new();
// dpf_resources::register(&mut registry);
// let registry = std::sync::Arc::new(registry);
// ```

pub mod common_configs;
pub mod contracts;
pub mod records;
pub mod tsigs;
pub mod zones;

pub use common_configs::{CommonConfig, CommonConfigList};
pub use contracts::{Contact, Contract, ContractList, Phone};
pub use records::{Record, RecordList, RecordRdata, RecordState};
pub use tsigs::{Tsig, TsigList};
pub use zones::{Zone, ZoneApply, ZoneList};

use dpf_core::{Job, Registry};

/// Group of contract-level resources
pub use dpf_core::job::CORE_GROUP;

/// Group of zone-level resources
pub const ZONES_GROUP: &str = "zones.api.dns-platform.jp/v1";

/// Largest page the list endpoints return
pub const MAX_LIMIT: u64 = 100;

/// Register every resource of this crate, plus the core `Job`
///
/// # Panics
///
/// Panics when any of the kinds is already registered.
pub fn register(registry: &mut Registry) {
    registry.register(CORE_GROUP, "Job", Job::default());

    registry.register(CORE_GROUP, "Contract", Contract::default());
    registry.register(CORE_GROUP, "ContractList", ContractList::default());
    registry.register(CORE_GROUP, "CommonConfig", CommonConfig::default());
    registry.register(CORE_GROUP, "CommonConfigList", CommonConfigList::default());
    registry.register(CORE_GROUP, "Tsig", Tsig::default());
    registry.register(CORE_GROUP, "TsigList", TsigList::default());

    registry.register(ZONES_GROUP, "Zone", Zone::default());
    registry.register(ZONES_GROUP, "ZoneList", ZoneList::default());
    registry.register(ZONES_GROUP, "ZoneApply", ZoneApply::default());
    registry.register(ZONES_GROUP, "Record", Record::default());
    registry.register(ZONES_GROUP, "RecordList", RecordList::default());

    tracing::debug!(
        core = registry.kinds(CORE_GROUP).len(),
        zones = registry.kinds(ZONES_GROUP).len(),
        "registered DNS platform resources"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        register(&mut registry);
        registry
    }

    #[test]
    fn test_register_all_kinds() {
        let registry = registry();
        assert_eq!(registry.groups(), [CORE_GROUP, ZONES_GROUP]);
        assert_eq!(
            registry.kinds(ZONES_GROUP),
            ["Record", "RecordList", "Zone", "ZoneApply", "ZoneList"]
        );
        assert_eq!(registry.kinds(CORE_GROUP).len(), 7);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_register_twice_panics() {
        let mut registry = registry();
        register(&mut registry);
    }

    #[test]
    fn test_parse_record_envelope() {
        let registry = registry();
        let envelope = format!(
            r#"{{
                "apiVersion": "{ZONES_GROUP}",
                "kind": "Record",
                "resource": {{"id": "r1", "name": "www.example.jp.", "ttl": 60, "rrtype": "A", "rdata": [{{"value": "192.0.2.1"}}]}}
            }}"#
        );

        let parsed = registry.parse(envelope.as_bytes()).unwrap();
        assert_eq!(parsed.kind(), "Record");
        let record = parsed.downcast::<Record>().unwrap();
        assert_eq!(record.ttl, 60);
        assert_eq!(record.rdata[0].value, "192.0.2.1");
    }

    #[test]
    fn test_envelope_round_trip_zone() {
        let registry = registry();
        let zone = Zone {
            id: "m1".to_string(),
            name: "example.jp.".to_string(),
            favorite: 1,
            description: "primary".to_string(),
            ..Default::default()
        };

        let bytes = registry.to_envelope(&zone).unwrap();
        let parsed = registry.parse(&bytes).unwrap();
        assert_eq!(parsed.downcast_ref::<Zone>(), Some(&zone));
    }
}
