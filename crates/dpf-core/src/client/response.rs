//! Wire envelopes exchanged with the API

use crate::error::ErrorDetail;
use serde::Deserialize;
use serde_json::Value;

/// Synchronous success envelope of read-style calls
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SyncResponse {
    pub request_id: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

/// `result` of a count call
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CountResult {
    pub count: u64,
}

/// Envelope of a mutating call accepted for asynchronous processing
///
/// Synchronous mutation envelopes decode into this too, with no `jobs_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AsyncResponse {
    /// Correlates the request with its job
    pub request_id: String,
    /// Where the job can be polled
    #[serde(default)]
    pub jobs_url: Option<String>,
}

/// Error body of a non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub request_id: Option<String>,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Vec<ErrorDetail>,
}
