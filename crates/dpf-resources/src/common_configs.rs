// # Common Configs
//
// Shared zone settings (name servers, TSIG key, managed DNS) of a contract.
//
// ## API Reference
//
// - Create: POST `/contracts/:contract_id/common_configs`
// - Read / Update / Delete: `/contracts/:contract_id/common_configs/:id`
// - List: GET `/contracts/:contract_id/common_configs`

use crate::CORE_GROUP;
use dpf_core::{Action, ListSpec, Method, NullablePositiveInt64, Spec, fields};

/// Shared zone settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonConfig {
    /// Owning contract
    pub contract_id: String,
    /// Config id
    pub id: i64,
    /// Config id as used by zones
    pub common_config_id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Whether managed DNS is enabled for zones using this config
    pub managed_dns_enabled: bool,
    /// Whether this is the contract's default config
    pub is_default: bool,
    /// TSIG key used for zone transfers; zero detaches the key
    pub tsig_id: NullablePositiveInt64,
}

fields! {
    CommonConfig {
        contract_id: [],
        id: [Read("id")],
        common_config_id: [Read("common_config_id")],
        name: [Read("name"), Create("name"), Update("name", omitempty)],
        description: [Read("description"), Create("description", omitempty), Update("description")],
        managed_dns_enabled: [Read("managed_dns_enabled")],
        is_default: [Read("default")],
        tsig_id: [Read("tsig_id"), Create("tsig_id", omitempty), Update("tsig_id", omitempty)],
    }
    identifiers: [contract_id, id]
}

impl Spec for CommonConfig {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "CommonConfig"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        if self.contract_id.is_empty() {
            return None;
        }
        let collection = format!("/contracts/{}/common_configs", self.contract_id);
        if action == Action::Create {
            return Some((Method::POST, collection));
        }
        if self.id == 0 {
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

/// Common configs of one contract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonConfigList {
    /// Owning contract
    pub contract_id: String,
    /// Fetched configs
    pub items: Vec<CommonConfig>,
}

fields! {
    CommonConfigList {
        contract_id: [],
        items: [Read("items")],
    }
    identifiers: [contract_id]
}

impl Spec for CommonConfigList {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "CommonConfigList"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        match action {
            Action::List if !self.contract_id.is_empty() => Some((
                Method::GET,
                format!("/contracts/{}/common_configs", self.contract_id),
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

impl ListSpec for CommonConfigList {
    type Item = CommonConfig;

    fn items(&self) -> &[CommonConfig] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<CommonConfig> {
        &mut self.items
    }

    fn prepare_item(&self, item: &mut CommonConfig) {
        item.contract_id.clone_from(&self.contract_id);
    }
}
