use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

use crate::leave::error::LeaveError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// A manager's verdict on a pending request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// `None` when the status is terminal.
    pub fn transition(self, decision: Decision) -> Option<LeaveStatus> {
        if self.is_terminal() {
            None
        } else {
            Some(decision.target_status())
        }
    }
}

/// Resolves `request` with `decision`, or fails with `AlreadyProcessed`.
pub fn resolve(request: &LeaveRequest, decision: Decision) -> Result<LeaveStatus, LeaveError> {
    request
        .status
        .transition(decision)
        .ok_or(LeaveError::AlreadyProcessed(request.id))
}
