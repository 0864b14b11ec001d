//! Transport implementations
//!
//! The client talks to the network only through [`Transport`](crate::Transport).
//! [`ReqwestTransport`] is the default implementation.

mod http;

pub use http::ReqwestTransport;
