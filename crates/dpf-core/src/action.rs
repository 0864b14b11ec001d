//! Client actions and the field-tag actions they project through

use std::fmt;

/// One logical operation a client performs against a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Fetch a single resource
    Read,
    /// Fetch one page of a collection
    List,
    /// Count the members of a collection
    Count,
    /// Create a resource (async job)
    Create,
    /// Modify a resource (async job)
    Update,
    /// Remove a resource (async job)
    Delete,
    /// Commit pending changes (async job)
    Apply,
    /// Discard pending changes (async job)
    Cancel,
}

impl Action {
    /// Lower-case action name
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::List => "list",
            Action::Count => "count",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Apply => "apply",
            Action::Cancel => "cancel",
        }
    }

    /// Whether the action changes server state
    pub fn is_mutating(self) -> bool {
        !matches!(self, Action::Read | Action::List | Action::Count)
    }

    /// Field tag used to build the request body, `None` for body-less actions
    pub fn body_action(self) -> Option<FieldAction> {
        match self {
            Action::Create => Some(FieldAction::Create),
            Action::Update => Some(FieldAction::Update),
            Action::Apply => Some(FieldAction::Apply),
            Action::Read | Action::List | Action::Count | Action::Delete | Action::Cancel => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action a field tag is declared for
///
/// `Read` governs absorption of response payloads; the others govern which
/// fields a request body carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAction {
    /// Field is populated from responses
    Read,
    /// Field is sent on create
    Create,
    /// Field is sent on update
    Update,
    /// Field is sent on apply
    Apply,
}
