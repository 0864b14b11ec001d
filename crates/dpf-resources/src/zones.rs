// # Zones
//
// Zones hold records. Record changes are staged and only reach the name
// servers once the zone's pending changes are applied.
//
// ## API Reference
//
// - Read / Update: `/zones/:zone_id`
// - List: GET `/zones`
// - Count: GET `/zones/count`
// - Apply staged changes: PATCH `/zones/:zone_id/changes`
// - Cancel staged changes: DELETE `/zones/:zone_id/changes`

use crate::{MAX_LIMIT, ZONES_GROUP};
use chrono::{DateTime, Utc};
use dpf_core::{Action, CountableListSpec, ListSpec, Method, Spec, fields};

/// A DNS zone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Zone {
    /// Zone id (`m1`)
    pub id: String,
    /// Zone apex (`example.jp.`)
    pub name: String,
    /// Owning contract
    pub contract_id: String,
    /// Common config applied to the zone
    pub common_config_id: i64,
    /// Service code shown on invoices
    pub service_code: String,
    /// Zone state (`1` = running)
    pub state: i32,
    /// Favorite flag shown in the console (`1` or `2`)
    pub favorite: i32,
    /// Free-form description
    pub description: String,
    /// Zone proxy status
    pub zone_proxy_enabled: bool,
    /// When the zone was created
    pub created_at: Option<DateTime<Utc>>,
}

fields! {
    Zone {
        id: [Read("id")],
        name: [Read("name")],
        contract_id: [Read("contract_id")],
        common_config_id: [Read("common_config_id")],
        service_code: [Read("service_code")],
        state: [Read("state")],
        favorite: [Read("favorite"), Update("favorite", omitempty)],
        description: [Read("description"), Update("description")],
        zone_proxy_enabled: [Read("zone_proxy_enabled")],
        created_at: [Read("created_at")],
    }
    identifiers: [id]
}

impl Spec for Zone {
    fn group(&self) -> &'static str {
        ZONES_GROUP
    }

    fn kind(&self) -> &'static str {
        "Zone"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.id.is_empty() {
            return None;
        }
        let path = format!("/zones/{}", self.id);
        match action {
            Action::Read => Some((Method::GET, path)),
            Action::Update => Some((Method::PATCH, path)),
            _ => None,
        }
    }
}

/// All zones visible to the token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneList {
    /// Fetched zones
    pub items: Vec<Zone>,
    /// Count reported by the last count call
    pub count: u64,
}

fields! {
    ZoneList {
        items: [Read("items")],
        count: [Read("count")],
    }
}

impl Spec for ZoneList {
    fn group(&self) -> &'static str {
        ZONES_GROUP
    }

    fn kind(&self) -> &'static str {
        "ZoneList"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        match action {
            Action::List => Some((Method::GET, "/zones".to_string())),
            Action::Count => Some((Method::GET, "/zones/count".to_string())),
            _ => None,
        }
    }
}

impl ListSpec for ZoneList {
    type Item = Zone;

    fn items(&self) -> &[Zone] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<Zone> {
        &mut self.items
    }
}

impl CountableListSpec for ZoneList {
    fn max_limit(&self) -> u64 {
        MAX_LIMIT
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn set_count(&mut self, count: u64) {
        self.count = count;
    }
}

/// Staged changes of a zone, applied or cancelled as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneApply {
    /// Zone whose changes are applied
    pub zone_id: String,
    /// Change description recorded in the zone history
    pub description: String,
}

fields! {
    ZoneApply {
        zone_id: [],
        description: [Apply("description", omitempty)],
    }
    identifiers: [zone_id]
}

impl Spec for ZoneApply {
    fn group(&self) -> &'static str {
        ZONES_GROUP
    }

    fn kind(&self) -> &'static str {
        "ZoneApply"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.zone_id.is_empty() {
            return None;
        }
        let path = format!("/zones/{}/changes", self.zone_id);
        match action {
            Action::Apply => Some((Method::PATCH, path)),
            Action::Cancel => Some((Method::DELETE, path)),
            _ => None,
        }
    }
}
