// # Records
//
// Resource record sets of a zone. Every change is staged: a record moves
// from `ToBeAdded`/`ToBeUpdated`/`ToBeDeleted` to `Applied` once the zone's
// changes are applied.
//
// ## API Reference
//
// - Create: POST `/zones/:zone_id/records`
// - Read / Update / Delete: `/zones/:zone_id/records/:record_id`
// - List: GET `/zones/:zone_id/records`
// - Count: GET `/zones/:zone_id/records/count`

use crate::{MAX_LIMIT, ZONES_GROUP};
use dpf_core::projection::{Value, WireValue};
use dpf_core::{
    Action, CountableListSpec, Error, FieldAction, ListSpec, Method, Progress, Result, Spec,
    Watchable, fields,
};

/// Staging state of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Live on the name servers
    #[default]
    Applied,
    /// Created, waiting for apply
    ToBeAdded,
    /// Deleted, waiting for apply
    ToBeDeleted,
    /// Changed, waiting for apply
    ToBeUpdated,
}

impl RecordState {
    /// Wire code
    pub fn code(self) -> i64 {
        match self {
            RecordState::Applied => 0,
            RecordState::ToBeAdded => 1,
            RecordState::ToBeDeleted => 2,
            RecordState::ToBeUpdated => 3,
        }
    }
}

impl WireValue for RecordState {
    fn to_wire(&self, _action: FieldAction) -> Value {
        Value::from(self.code())
    }

    fn from_wire(value: Value) -> Result<Self> {
        match value.as_i64() {
            Some(0) => Ok(RecordState::Applied),
            Some(1) => Ok(RecordState::ToBeAdded),
            Some(2) => Ok(RecordState::ToBeDeleted),
            Some(3) => Ok(RecordState::ToBeUpdated),
            _ => Err(Error::field("", format!("unknown record state {value}"))),
        }
    }

    fn absorb_wire(&mut self, value: Value) -> Result<()> {
        if !value.is_null() {
            *self = Self::from_wire(value)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == RecordState::Applied
    }
}

/// One value of a record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordRdata {
    /// Presentation-format rdata (`192.0.2.1`, `10 mx.example.jp.`)
    pub value: String,
}

fields! {
    RecordRdata {
        value: [Read("value"), Create("value"), Update("value")],
    }
}

impl RecordRdata {
    /// Rdata holding `value`
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A resource record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Owning zone
    pub zone_id: String,
    /// Record id
    pub id: String,
    /// Owner name (`www.example.jp.`)
    pub name: String,
    /// TTL in seconds
    pub ttl: i32,
    /// Record type (`A`, `MX`, ...)
    pub rrtype: String,
    /// Record values
    pub rdata: Vec<RecordRdata>,
    /// Free-form description
    pub description: String,
    /// Staging state
    pub state: RecordState,
    /// Who made the last change
    pub operator: String,
}

fields! {
    Record {
        zone_id: [],
        id: [Read("id")],
        name: [Read("name"), Create("name")],
        ttl: [Read("ttl"), Create("ttl", omitempty), Update("ttl", omitempty)],
        rrtype: [Read("rrtype"), Create("rrtype")],
        rdata: [Read("rdata"), Create("rdata"), Update("rdata", omitempty)],
        description: [Read("description"), Create("description", omitempty), Update("description")],
        state: [Read("state")],
        operator: [Read("operator")],
    }
    identifiers: [zone_id, id]
}

impl Spec for Record {
    fn group(&self) -> &'static str {
        ZONES_GROUP
    }

    fn kind(&self) -> &'static str {
        "Record"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.zone_id.is_empty() {
            return None;
        }
        let collection = format!("/zones/{}/records", self.zone_id);
        if action == Action::Create {
            return Some((Method::POST, collection));
        }
        if self.id.is_empty() {
            return None;
        }
        let path = format!("{collection}/{}", self.id);
        match action {
            Action::Read => Some((Method::GET, path)),
            Action::Update => Some((Method::PATCH, path)),
            Action::Delete => Some((Method::DELETE, path)),
            _ => None,
        }
    }
}

impl Watchable for Record {
    fn progress(&self) -> Progress {
        match self.state {
            RecordState::Applied => Progress::Succeeded,
            _ => Progress::Pending,
        }
    }
}

/// Records of one zone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordList {
    /// Owning zone
    pub zone_id: String,
    /// Fetched records
    pub items: Vec<Record>,
    /// Count reported by the last count call
    pub count: u64,
}

fields! {
    RecordList {
        zone_id: [],
        items: [Read("items")],
        count: [Read("count")],
    }
    identifiers: [zone_id]
}

impl Spec for RecordList {
    fn group(&self) -> &'static str {
        ZONES_GROUP
    }

    fn kind(&self) -> &'static str {
        "RecordList"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.zone_id.is_empty() {
            return None;
        }
        match action {
            Action::List => Some((Method::GET, format!("/zones/{}/records", self.zone_id))),
            Action::Count => Some((Method::GET, format!("/zones/{}/records/count", self.zone_id))),
            _ => None,
        }
    }

    fn init(&mut self) {
        for item in &mut self.items {
            item.zone_id.clone_from(&self.zone_id);
        }
    }
}

impl ListSpec for RecordList {
    type Item = Record;

    fn items(&self) -> &[Record] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<Record> {
        &mut self.items
    }

    fn prepare_item(&self, item: &mut Record) {
        item.zone_id.clone_from(&self.zone_id);
    }
}

impl CountableListSpec for RecordList {
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

impl Watchable for RecordList {
    fn progress(&self) -> Progress {
        if self.items.iter().all(|record| record.state == RecordState::Applied) {
            Progress::Succeeded
        } else {
            Progress::Pending
        }
    }
}
