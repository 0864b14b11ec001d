// # dpf-core
//
// Core library of the typed DNS platform API client.
//
// ## Architecture Overview
//
// This library provides the generic machinery shared by every resource:
// - **Spec**: Trait every API resource implements (group, kind, routes)
// - **Field Projection**: Per-action serialization driven by `fields!` tables
// - **Path Parameter Binder**: Positional identifiers bound into resources
// - **Registry**: `(apiVersion, kind)` -> resource prototype lookup
// - **Client**: One HTTP exchange per action over an injected `Transport`
// - **Watcher**: Explicit polling state machine for asynchronous jobs
//
// ## Design Principles
//
// 1. **Data-Only Resources**: Resources are plain structs plus a field table
// 2. **Injected Transport**: The client never owns the network; tests mock it
// 3. **Explicit Registry**: No global state, registration needs `&mut`
// 4. **No Hidden Retries**: One request per call; polling only in the watcher
// 5. **Panics Only for Schema Bugs**: Everything reachable from input is a `Result`

pub mod action;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod job;
pub mod params;
pub mod projection;
pub mod registry;
pub mod traits;
pub mod transport;
pub mod watch;

// Re-export core types for convenience
pub use action::{Action, FieldAction};
pub use client::{AsyncResponse, Client, SearchParams};
pub use config::{ClientConfig, WatchConfig};
pub use context::Context;
pub use error::{BadResponse, Error, ErrorDetail, Result};
pub use job::{Job, JobStatus};
pub use params::PathArg;
pub use projection::{NullablePositiveInt64, Projectable};
pub use registry::Registry;
pub use traits::{
    CountableListSpec, HttpRequest, HttpResponse, ListSpec, Progress, Spec, Transport,
    TransportError, Watchable,
};
pub use transport::ReqwestTransport;
pub use watch::{WatchState, Watcher};

// HTTP method type used in `Spec::path_method`
pub use reqwest::Method;
