//! Asynchronous job resource
//!
//! Every mutating call the server accepts for asynchronous processing
//! creates a job, addressed by the request id of that call.

use crate::action::{Action, FieldAction};
use crate::error::{ErrorDetail, Result};
use crate::projection::WireValue;
use crate::traits::{Progress, Spec, Watchable};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;

/// API group of the core resources
pub const CORE_GROUP: &str = "core.api.dns-platform.jp/v1";

/// Lifecycle of a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Still being processed
    #[default]
    Running,
    /// Finished successfully
    Successful,
    /// Finished with an error
    Failed,
}

impl JobStatus {
    /// Wire form
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "RUNNING",
            JobStatus::Successful => "SUCCESSFUL",
            JobStatus::Failed => "FAILED",
        }
    }
}

impl WireValue for JobStatus {
    fn to_wire(&self, _action: FieldAction) -> Value {
        Value::from(self.as_str())
    }

    fn from_wire(value: Value) -> Result<Self> {
        match String::from_wire(value)?.as_str() {
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCESSFUL" => Ok(JobStatus::Successful),
            "FAILED" => Ok(JobStatus::Failed),
            other => Err(crate::Error::field("", format!("unknown job status `{other}`"))),
        }
    }

    fn absorb_wire(&mut self, value: Value) -> Result<()> {
        if !value.is_null() {
            *self = Self::from_wire(value)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == JobStatus::Running
    }
}

crate::fields! {
    ErrorDetail {
        code: [Read("code")],
        attribute: [Read("attribute")],
    }
}

/// An asynchronous job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    /// Request id of the call that created the job
    pub request_id: String,
    /// Processing status
    pub status: JobStatus,
    /// URL of the resources the job touched
    pub resources_url: String,
    /// Server error type of a failed job
    pub error_type: String,
    /// Server message of a failed job
    pub error_message: String,
    /// Per-attribute details of a failed job
    pub error_details: Vec<ErrorDetail>,
    /// When processing started
    pub begin_time: Option<DateTime<Utc>>,
    /// When processing ended
    pub end_time: Option<DateTime<Utc>>,
}

crate::fields! {
    Job {
        request_id: [Read("request_id")],
        status: [Read("status")],
        resources_url: [Read("resources_url")],
        error_type: [Read("error_type")],
        error_message: [Read("error_message")],
        error_details: [Read("error_details")],
        begin_time: [Read("begin_time")],
        end_time: [Read("end_time")],
    }
    identifiers: [request_id]
}

impl Job {
    /// Job addressed by `request_id`, not fetched yet
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }
}

impl Spec for Job {
    fn group(&self) -> &'static str {
        CORE_GROUP
    }

    fn kind(&self) -> &'static str {
        "Job"
    }

    fn path_method(&self, action: Action) -> Option<(Method, String)> {
        match action {
            Action::Read if !self.request_id.is_empty() => {
                Some((Method::GET, format!("/jobs/{}", self.request_id)))
            }
            _ => None,
        }
    }
}

impl Watchable for Job {
    fn progress(&self) -> Progress {
        match self.status {
            JobStatus::Running => Progress::Pending,
            JobStatus::Successful => Progress::Succeeded,
            JobStatus::Failed => {
                let mut reason = match (self.error_type.is_empty(), self.error_message.is_empty()) {
                    (false, false) => format!("{}: {}", self.error_type, self.error_message),
                    (false, true) => self.error_type.clone(),
                    (true, false) => self.error_message.clone(),
                    (true, true) => format!("job {} failed", self.request_id),
                };
                for detail in &self.error_details {
                    reason.push_str(&format!(" [{} {}]", detail.code, detail.attribute));
                }
                Progress::Failed(reason)
            }
        }
    }
}
