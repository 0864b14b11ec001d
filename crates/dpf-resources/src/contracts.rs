// # Contracts
//
// A contract is the billing and ownership unit every other resource hangs
// off. Contracts are read-mostly: only the favorite flag, description and
// contact can be changed.
//
// ## API Reference
//
// - Read: GET `/contracts/:contract_id`
// - Update: PATCH `/contracts/:contract_id`
// - List: GET `/contracts`
// - Count: GET `/contracts/count`

use crate::{CORE_GROUP, MAX_LIMIT};
use chrono::{DateTime, Utc};
use dpf_core::{Action, CountableListSpec, ListSpec, Method, Spec, fields};

/// Telephone number of a contact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phone {
    /// Country calling code without `+` (`81`)
    pub country_code: String,
    /// Subscriber number
    pub number: String,
}

fields! {
    Phone {
        country_code: [Read("country_code"), Update("country_code", omitempty)],
        number: [Read("number"), Update("number", omitempty)],
    }
}

/// Technical contact of a contract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    /// Contact name
    pub name: String,
    /// Contact e-mail address
    pub email: String,
    /// Contact phone
    pub phone: Phone,
}

fields! {
    Contact {
        name: [Read("name"), Update("name", omitempty)],
        email: [Read("email"), Update("email", omitempty)],
        phone: [Read("phone"), Update("phone", omitempty)],
    }
}

/// A service contract
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contract {
    /// Contract id (`f123456`)
    pub id: String,
    /// Service code shown on invoices
    pub service_code: String,
    /// Contract state (`1` = running)
    pub state: i32,
    /// Favorite flag shown in the console (`1` or `2`)
    pub favorite: i32,
    /// Free-form description
    pub description: String,
    /// Technical contact
    pub contact: Contact,
    /// Service start
    pub service_start_time: Option<DateTime<Utc>>,
}

fields! {
    Contract {
        id: [Read("id")],
        service_code: [Read("service_code")],
        state: [Read("state")],
        favorite: [Read("favorite"), Update("favorite", omitempty)],
        description: [Read("description"), Update("description")],
        contact: [Read("contact"), Update("contact", omitempty)],
        service_start_time: [Read("service_start_time")],
    }
    identifiers: [id]
}

impl Spec for Contract {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "Contract"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.id.is_empty() {
            return None;
        }
        let path = format!("/contracts/{}", self.id);
        match action {
            Action::Read => Some((Method::GET, path)),
            Action::Update => Some((Method::PATCH, path)),
            _ => None,
        }
    }
}

/// All contracts visible to the token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractList {
    /// Fetched contracts
    pub items: Vec<Contract>,
    /// Count reported by the last count call
    pub count: u64,
}

fields! {
    ContractList {
        items: [Read("items")],
        count: [Read("count")],
    }
}

impl Spec for ContractList {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "ContractList"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        match action {
            Action::List => Some((Method::GET, "/contracts".to_string())),
            Action::Count => Some((Method::GET, "/contracts/count".to_string())),
            _ => None,
        }
    }
}

impl ListSpec for ContractList {
    type Item = Contract;

    fn items(&self) -> &[Contract] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<Contract> {
        &mut self.items
    }
}

impl CountableListSpec for ContractList {
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
