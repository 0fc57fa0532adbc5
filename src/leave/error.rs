use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use strum::Display;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum Entity {
    User,
    #[strum(serialize = "Leave")]
    LeaveRequest,
}

/// Failure of a leave operation. Every variant leaves storage unchanged.
#[derive(Debug, Error)]
pub enum LeaveError {
    #[error("{0} {1} not found")]
    NotFound(Entity, u64),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Leave {0} already processed")]
    AlreadyProcessed(u64),

    #[error("{0}")]
    InvalidInput(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::NotFound(..) => StatusCode::NOT_FOUND,
            LeaveError::Forbidden(_) => StatusCode::FORBIDDEN,
            LeaveError::AlreadyProcessed(_) | LeaveError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            LeaveError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            LeaveError::StorageUnavailable(e) => {
                tracing::error!(error = %e, "Storage failure");
                "Service temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(
            LeaveError::NotFound(Entity::LeaveRequest, 9).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LeaveError::Forbidden("Only managers can approve leave").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            LeaveError::AlreadyProcessed(1).status_code(),
            StatusCode::BAD_REQUEST
        );
        let corrupt = StoreError::CorruptRow {
            table: "users",
            id: 1,
            reason: "unknown role".into(),
        };
        assert_eq!(
            LeaveError::from(corrupt).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn messages_name_the_missing_entity() {
        assert_eq!(
            LeaveError::NotFound(Entity::LeaveRequest, 9).to_string(),
            "Leave 9 not found"
        );
        assert_eq!(LeaveError::NotFound(Entity::User, 3).to_string(), "User 3 not found");
    }
}
