//! Core traits for the DNS platform SDK
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Spec`]: An API resource and its routes
//! - [`ListSpec`] / [`CountableListSpec`]: Collection resources
//! - [`Watchable`]: Resources whose state settles asynchronously
//! - [`Transport`]: The HTTP exchange

pub mod spec;
pub mod transport;

pub use spec::{CountableListSpec, ListSpec, Progress, Spec, SpecObject, Watchable};
pub use transport::{HttpRequest, HttpResponse, Transport, TransportError};
