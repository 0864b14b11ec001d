// # Resource Traits
//
// Defines the contract every API resource fulfils.
//
// ## Implementations
//
// - Job: `dpf_core::job`
// - Contracts, zones, records, TSIG keys, common configs: `dpf-resources` crate
//
// ## Usage
//
// ```rust,ignore
// use dpf_core::{Action, Spec};
//
// let zone = Zone { id: "m1".into(), ..Default::default() };
// let (method, path) = zone.path_method(Action::Read).unwrap();
// assert_eq!(path, "/zones/m1");
// ```

use crate::action::Action;
use crate::projection::{Fields, Projectable};
use reqwest::Method;
use std::any::Any;
use std::fmt::Debug;

/// An API resource: one schema kind within one API group
///
/// Resources describe their wire fields through the `fields!` table
/// (inherited via [`Fields`]) and describe their routes through
/// [`Spec::path_method`].
///
/// # Thread Safety
///
/// Resources are plain data and must be `Send + Sync`.
pub trait Spec: Fields + SpecObject + Debug + Send + Sync {
    /// API group, used as the `apiVersion` of schema envelopes
    fn group(&self) -> &'static str;

    /// Schema kind within the group
    fn kind(&self) -> &'static str;

    /// HTTP method and path (relative to the endpoint) for `action`
    ///
    /// `None` marks the action as unsupported for this resource.
    fn path_method(&self, action: Action) -> Option<(Method, String)>;

    /// Hook run after the resource was populated from a response or envelope
    fn init(&mut self) {}
}

/// Type-erasure support for [`Spec`]
///
/// Blanket-implemented for every `Spec + Clone`; never implement it by hand.
pub trait SpecObject: Any {
    /// Upcast for downcasting by reference
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting by mutable reference
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Upcast for downcasting by value
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Deep copy behind the trait object
    fn clone_spec(&self) -> Box<dyn Spec>;
}

impl<T: Spec + Clone> SpecObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_spec(&self) -> Box<dyn Spec> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Spec> {
    fn clone(&self) -> Self {
        (**self).clone_spec()
    }
}

impl dyn Spec {
    /// Borrow the concrete resource, if it is a `T`
    pub fn downcast_ref<T: Spec>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably borrow the concrete resource, if it is a `T`
    pub fn downcast_mut<T: Spec>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Recover the concrete resource, if it is a `T`
    pub fn downcast<T: Spec>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast().ok()
    }
}

/// A collection resource that owns its items
pub trait ListSpec: Spec + Clone {
    /// Member type
    type Item: Spec + Projectable + Clone;

    /// Items in server order
    fn items(&self) -> &[Self::Item];

    /// Mutable item storage
    fn items_mut(&mut self) -> &mut Vec<Self::Item>;

    /// Number of items held
    fn len(&self) -> usize {
        self.items().len()
    }

    /// `true` when no items are held
    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Item at `index`
    fn index(&self, index: usize) -> Option<&Self::Item> {
        self.items().get(index)
    }

    /// Append a copy of `item`
    fn add_item(&mut self, item: &Self::Item) {
        self.items_mut().push(item.clone());
    }

    /// Drop all items
    fn clear_items(&mut self) {
        self.items_mut().clear();
    }

    /// Hook run on every item absorbed from a list response, before the
    /// item's own `init()`; copies parent identifiers into the item
    fn prepare_item(&self, _item: &mut Self::Item) {}
}

/// A collection that supports counting and paging
pub trait CountableListSpec: ListSpec {
    /// Largest page the server returns
    fn max_limit(&self) -> u64;

    /// Count reported by the last count call
    fn count(&self) -> u64;

    /// Store the count reported by the server
    fn set_count(&mut self, count: u64);
}

/// Progress of a watched resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Not settled yet
    Pending,
    /// Settled successfully
    Succeeded,
    /// Settled in a failure state
    Failed(String),
}

/// A resource whose fetched state tells whether an async change settled
pub trait Watchable {
    /// Progress as of the last absorbed response
    fn progress(&self) -> Progress;
}
