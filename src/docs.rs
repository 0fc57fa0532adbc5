use crate::api::leave_request::{ApplyLeaveResponse, ApproveLeaveResponse, MessageResponse};
use crate::leave::lifecycle::Decision;
use crate::leave::service::{ApplyLeave, LeaveView, OwnLeave, TeamLeave};
use crate::model::leave_request::LeaveStatus;
use crate::model::role::Role;
use crate::model::user::{LeaveBalance, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management

Employees apply for leave, managers approve or reject it.

### 🔹 Workflow
- A request starts **PENDING** and is resolved exactly once, to **APPROVED** or **REJECTED**
- Approval draws from paid leave first; any shortfall is booked as unpaid leave
- Managers see every request, employees only their own

### 🔐 Security
All `/api` endpoints require a **JWT Bearer** token issued for an existing user.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::user::me
    ),
    components(
        schemas(
            ApplyLeave,
            ApplyLeaveResponse,
            ApproveLeaveResponse,
            MessageResponse,
            TeamLeave,
            OwnLeave,
            LeaveView,
            LeaveStatus,
            Decision,
            Role,
            User,
            LeaveBalance
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "User", description = "Caller profile APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_leave_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/api/leave",
            "/api/leave/{leave_id}/approve",
            "/api/leave/{leave_id}/reject",
            "/api/me",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }

        let schemas = doc.components.expect("components").schemas;
        for expected in ["LeaveView", "TeamLeave", "OwnLeave"] {
            assert!(schemas.contains_key(expected), "missing schema {expected}");
        }
    }
}
