//! Error types for the DNS platform SDK
//!
//! This module defines all error types used throughout the crate.

use crate::action::Action;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS platform SDK
#[derive(Error, Debug)]
pub enum Error {
    /// Schema envelope is not valid JSON
    #[error("failed to parse json: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Schema envelope has no `kind`
    #[error("kind value is not exist")]
    MissingKind,

    /// Schema envelope has no `apiVersion`
    #[error("apiVersion value is not exist")]
    MissingApiVersion,

    /// No group is registered under the apiVersion
    #[error("apiVersion `{0}` is not supported")]
    UnsupportedApiVersion(String),

    /// The group exists but the kind is not registered in it
    #[error("kind `{kind}` is not supported by apiVersion `{api_version}`")]
    UnsupportedKind {
        /// Requested apiVersion
        api_version: String,
        /// Requested kind
        kind: String,
    },

    /// Envelope payload does not fit the registered type
    #[error("failed to parse resource: {0}")]
    ResourceParse(#[source] Box<Error>),

    /// A wire value does not fit the field it was absorbed into
    #[error("field `{field}`: {message}")]
    Field {
        /// Wire path of the field (`contact.phone.number`)
        field: String,
        /// What went wrong
        message: String,
    },

    /// Path parameter list has the wrong arity
    #[error("number of path params must be {expected}, got {actual}")]
    ParamCount {
        /// Identifier fields declared by the resource
        expected: usize,
        /// Arguments supplied by the caller
        actual: usize,
    },

    /// Path parameter has the wrong type for its identifier field
    #[error("path param #{index} ({field}) must be {expected}, got {actual}")]
    ParamType {
        /// Zero-based position of the argument
        index: usize,
        /// Identifier field name
        field: &'static str,
        /// Type the field accepts
        expected: &'static str,
        /// Type the caller supplied
        actual: &'static str,
    },

    /// The resource reports no method/path for the action
    #[error("{kind} does not support the {action} action")]
    UnsupportedAction {
        /// Resource kind
        kind: String,
        /// Requested action
        action: Action,
    },

    /// Non-2xx status, transport failure or undecodable body
    #[error("{0}")]
    BadResponse(Box<BadResponse>),

    /// Watched resource reached a terminal failure state
    #[error("watch of {kind} failed: {reason}")]
    WatchFailed {
        /// Resource kind being watched
        kind: String,
        /// Failure reported by the resource
        reason: String,
    },

    /// The context was cancelled by the caller
    #[error("context cancelled")]
    Cancelled,

    /// The context deadline passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a field error
    pub fn field(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Field {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// The bad response carried by this error, if any
    pub fn bad_response(&self) -> Option<&BadResponse> {
        match self {
            Self::BadResponse(response) => Some(response),
            _ => None,
        }
    }

    /// `true` for [`Error::Cancelled`] and [`Error::DeadlineExceeded`]
    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

impl From<BadResponse> for Error {
    fn from(response: BadResponse) -> Self {
        Self::BadResponse(Box::new(response))
    }
}

/// One entry of the `error_details` array reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`invalid`, `notfound`, ...)
    #[serde(default)]
    pub code: String,
    /// Attribute the code refers to
    #[serde(default)]
    pub attribute: String,
}

/// A failed HTTP exchange, annotated with the request that caused it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadResponse {
    /// HTTP method of the request
    pub method: String,
    /// Request path (relative to the endpoint)
    pub path: String,
    /// HTTP status, `None` when the request never got a response
    pub status: Option<u16>,
    /// Server-assigned request id, when the error body carried one
    pub request_id: Option<String>,
    /// Server error type (`ParameterError`, `NotFound`, ...)
    pub error_type: Option<String>,
    /// Human-readable server message
    pub error_message: Option<String>,
    /// Per-attribute details
    pub error_details: Vec<ErrorDetail>,
    /// Transport message or raw (truncated) response body
    pub detail: String,
}

impl BadResponse {
    /// Statuses worth polling again: throttling and gateway trouble
    pub fn is_retryable(&self) -> bool {
        matches!(self.status, None | Some(429 | 502 | 503 | 504))
    }
}

impl fmt::Display for BadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: bad response", self.method, self.path)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " request_id={request_id}")?;
        }
        match (&self.error_type, &self.error_message) {
            (Some(kind), Some(message)) => write!(f, ": {kind}: {message}")?,
            (Some(kind), None) => write!(f, ": {kind}")?,
            (None, Some(message)) => write!(f, ": {message}")?,
            (None, None) if !self.detail.is_empty() => write!(f, ": {}", self.detail)?,
            (None, None) => {}
        }
        for detail in &self.error_details {
            write!(f, " [{} {}]", detail.code, detail.attribute)?;
        }
        Ok(())
    }
}
