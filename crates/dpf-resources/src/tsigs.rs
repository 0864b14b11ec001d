// # TSIG Keys
//
// Shared secrets used to authenticate zone transfers. The server generates
// the secret; clients only choose the name and description.
//
// ## API Reference
//
// - Create: POST `/contracts/:contract_id/tsigs`
// - Read / Update / Delete: `/contracts/:contract_id/tsigs/:id`
// - List: GET `/contracts/:contract_id/tsigs`
// - Count: GET `/contracts/:contract_id/tsigs/count`

use crate::{CORE_GROUP, MAX_LIMIT};
use dpf_core::{Action, CountableListSpec, ListSpec, Method, Spec, fields};

/// A TSIG key
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Tsig {
    /// Owning contract
    pub contract_id: String,
    /// Key id
    pub id: i64,
    /// Key name
    pub name: String,
    /// HMAC algorithm code (`0` = hmac-sha256)
    pub algorithm: i32,
    /// Base64 secret
    /// ⚠️ NEVER log this value
    pub secret: String,
    /// Free-form description
    pub description: String,
}

// Custom Debug implementation that hides the secret
impl std::fmt::Debug for Tsig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tsig")
            .field("contract_id", &self.contract_id)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<REDACTED>")
            .field("description", &self.description)
            .finish()
    }
}

fields! {
    Tsig {
        contract_id: [],
        id: [Read("id")],
        name: [Read("name"), Create("name")],
        algorithm: [Read("algorithm")],
        secret: [Read("secret")],
        description: [Read("description"), Create("description", omitempty), Update("description")],
    }
    identifiers: [contract_id, id]
}

impl Spec for Tsig {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "Tsig"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.contract_id.is_empty() {
            return None;
        }
        let collection = format!("/contracts/{}/tsigs", self.contract_id);
        match action {
            Action::Create => Some((Method::POST, collection)),
            Action::Read if self.id != 0 => {
                Some((Method::GET, format!("{collection}/{}", self.id)))
            }
            Action::Update if self.id != 0 => {
                Some((Method::PATCH, format!("{collection}/{}", self.id)))
            }
            Action::Delete if self.id != 0 => {
                Some((Method::DELETE, format!("{collection}/{}", self.id)))
            }
            _ => None,
        }
    }
}

/// TSIG keys of one contract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsigList {
    /// Owning contract
    pub contract_id: String,
    /// Fetched keys
    pub items: Vec<Tsig>,
    /// Count reported by the last count call
    pub count: u64,
}

fields! {
    TsigList {
        contract_id: [],
        items: [Read("items")],
        count: [Read("count")],
    }
    identifiers: [contract_id]
}

impl Spec for TsigList {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "TsigList"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.contract_id.is_empty() {
            return None;
        }
        match action {
            Action::List => Some((Method::GET, format!("/contracts/{}/tsigs", self.contract_id))),
            Action::Count => Some((
                Method::GET,
                format!("/contracts/{}/tsigs/count", self.contract_id),
            )),
            _ => None,
        }
    }

    fn init(&mut self) {
        for item in &mut self.items {
            item.contract_id.clone_from(&self.contract_id);
        }
    }
}

impl ListSpec for TsigList {
    type Item = Tsig;

    fn items(&self) -> &[Tsig] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<Tsig> {
        &mut self.items
    }

    fn prepare_item(&self, item: &mut Tsig) {
        item.contract_id.clone_from(&self.contract_id);
    }
}

impl CountableListSpec for TsigList {
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
