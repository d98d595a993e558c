use serde::Serialize;

use crate::error::ServerError;

/// Terminal state of one operation execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The walk finished; `data` may still be partially nulled out.
    Completed,
    /// The admission gate refused the operation before execution started.
    Rejected,
    /// The cancellation signal fired mid-walk; no new field resolutions were
    /// started after it was observed.
    Cancelled,
}

impl ExecutionStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, ExecutionStatus::Completed)
    }

    pub fn is_rejected(self) -> bool {
        matches!(self, ExecutionStatus::Rejected)
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, ExecutionStatus::Cancelled)
    }
}

/// Result of one operation, serializing to `{data, errors}` on the wire.
#[derive(Debug, Serialize)]
pub struct Response {
    /// `None` when the operation never produced any data (admission
    /// rejection, pre-start cancellation); either way serialized as `null`.
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServerError>,

    #[serde(skip)]
    pub status: ExecutionStatus,
}

impl Response {
    pub(crate) fn new(data: Option<serde_json::Value>, errors: Vec<ServerError>, status: ExecutionStatus) -> Self {
        Self { data, errors, status }
    }

    /// A response carrying nothing but errors.
    pub fn from_errors(errors: Vec<ServerError>) -> Self {
        Self {
            data: None,
            errors,
            status: ExecutionStatus::Completed,
        }
    }

    pub(crate) fn rejected(error: ServerError) -> Self {
        Self {
            data: None,
            errors: vec![error],
            status: ExecutionStatus::Rejected,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
