use crate::auth::auth::AuthUser;
use crate::leave::RequestService;
use crate::leave::service::{ApplyLeave, DecisionOutcome, LeaveView};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ApplyLeaveResponse {
    #[schema(example = "Leave request submitted")]
    pub message: &'static str,
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "PENDING")]
    pub status: &'static str,
}

#[derive(Serialize, ToSchema)]
pub struct ApproveLeaveResponse {
    #[schema(example = "Leave approved")]
    pub message: &'static str,
    #[schema(example = 20)]
    pub paid_leave_remaining: u32,
    #[schema(example = 0)]
    pub unpaid_leave: u32,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Leave rejected")]
    pub message: &'static str,
}

fn decision_response(outcome: DecisionOutcome) -> HttpResponse {
    match outcome {
        DecisionOutcome::Approved { balance, .. } => HttpResponse::Ok().json(ApproveLeaveResponse {
            message: "Leave approved",
            paid_leave_remaining: balance.paid_leave,
            unpaid_leave: balance.unpaid_leave,
        }),
        DecisionOutcome::Rejected { .. } => HttpResponse::Ok().json(MessageResponse {
            message: "Leave rejected",
        }),
    }
}

/* =========================
Apply for leave (Employee)
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = ApplyLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = ApplyLeaveResponse),
        (status = 400, description = "Malformed body, non-positive days or malformed/inverted dates", body = Object, example = json!({
            "error": "days must be a positive number"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only employees can apply for leave"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    service: web::Data<RequestService>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    tracing::debug!(actor = %auth.name, "Leave application received");
    let id = service.apply(auth.user_id, &payload).await?;

    Ok(HttpResponse::Created().json(ApplyLeaveResponse {
        message: "Leave request submitted",
        id,
        status: "PENDING",
    }))
}

/* =========================
Approve leave (Manager)
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved, balances updated", body = ApproveLeaveResponse),
        (status = 400, description = "Leave already processed", body = Object, example = json!({
            "error": "Leave 1 already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    service: web::Data<RequestService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let outcome = service.approve(auth.user_id, path.into_inner()).await?;
    Ok(decision_response(outcome))
}

/* =========================
Reject leave (Manager)
========================= */
/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = MessageResponse),
        (status = 400, description = "Leave already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    service: web::Data<RequestService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let outcome = service.reject(auth.user_id, path.into_inner()).await?;
    Ok(decision_response(outcome))
}

/// Managers get every request with the requester name, employees only
/// their own.
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Every request with requester name for managers, own requests for employees", body = LeaveView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    service: web::Data<RequestService>,
) -> actix_web::Result<impl Responder> {
    let view: LeaveView = service.view(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{TestApp, token_for};
    use crate::routes::build_app;
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    const EMPLOYEE: u64 = 1;
    const MANAGER: u64 = 2;

    #[actix_web::test]
    async fn employee_applies_and_manager_approves() {
        let app = TestApp::seeded().await;
        let svc =
            test::init_service(build_app(app.config.clone(), app.service.clone())).await;

        let req = app
            .request(test::TestRequest::post().uri("/api/leave"), EMPLOYEE)
            .set_json(json!({"days": 10, "start_date": "2026-01-10", "end_date": "2026-01-19"}))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "PENDING");
        let id = body["id"].as_u64().unwrap();

        let req = app
            .request(
                test::TestRequest::put().uri(&format!("/api/leave/{id}/approve")),
                MANAGER,
            )
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(
            body,
            json!({"message": "Leave approved", "paid_leave_remaining": 20, "unpaid_leave": 0})
        );

        let req = app
            .request(
                test::TestRequest::put().uri(&format!("/api/leave/{id}/reject")),
                MANAGER,
            )
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], format!("Leave {id} already processed"));
    }

    #[actix_web::test]
    async fn error_kinds_map_to_status_codes() {
        let app = TestApp::seeded().await;
        let svc =
            test::init_service(build_app(app.config.clone(), app.service.clone())).await;

        let cases = [
            (
                app.request(test::TestRequest::post().uri("/api/leave"), MANAGER)
                    .set_json(json!({"days": 1, "start_date": "2026-01-10", "end_date": "2026-01-10"})),
                StatusCode::FORBIDDEN,
            ),
            (
                app.request(test::TestRequest::post().uri("/api/leave"), EMPLOYEE)
                    .set_json(json!({"days": 0, "start_date": "2026-01-10", "end_date": "2026-01-10"})),
                StatusCode::BAD_REQUEST,
            ),
            (
                app.request(test::TestRequest::put().uri("/api/leave/1/approve"), EMPLOYEE),
                StatusCode::FORBIDDEN,
            ),
            (
                app.request(test::TestRequest::put().uri("/api/leave/77/reject"), MANAGER),
                StatusCode::NOT_FOUND,
            ),
            (
                app.request(test::TestRequest::get().uri("/api/leave"), 42),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (req, expected) in cases {
            let resp = test::call_service(&svc, req.to_request()).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn malformed_bodies_are_invalid_input() {
        let app = TestApp::seeded().await;
        let svc =
            test::init_service(build_app(app.config.clone(), app.service.clone())).await;

        for body in [
            json!({"days": "3", "start_date": "2026-01-10", "end_date": "2026-01-12"}),
            json!({"days": 3, "end_date": "2026-01-12"}),
            json!({"days": 3, "start_date": 20260110, "end_date": "2026-01-12"}),
        ] {
            let req = app
                .request(test::TestRequest::post().uri("/api/leave"), EMPLOYEE)
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&svc, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string(), "{body}");
        }

        let req = app
            .request(test::TestRequest::get().uri("/api/leave"), EMPLOYEE)
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn listing_shape_depends_on_role() {
        let app = TestApp::seeded().await;
        let svc =
            test::init_service(build_app(app.config.clone(), app.service.clone())).await;

        let req = app
            .request(test::TestRequest::post().uri("/api/leave"), EMPLOYEE)
            .set_json(json!({"days": 2, "start_date": "2026-03-02", "end_date": "2026-03-03"}))
            .to_request();
        assert!(test::call_service(&svc, req).await.status().is_success());

        let req = app
            .request(test::TestRequest::get().uri("/api/leave"), MANAGER)
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(
            body,
            json!([{"id": 1, "name": "Employee One", "days": 2, "status": "PENDING"}])
        );

        let req = app
            .request(test::TestRequest::get().uri("/api/leave"), EMPLOYEE)
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(body, json!([{"id": 1, "days": 2, "status": "PENDING"}]));
    }

    #[actix_web::test]
    async fn requests_without_a_valid_token_are_unauthorized() {
        let app = TestApp::seeded().await;
        let svc =
            test::init_service(build_app(app.config.clone(), app.service.clone())).await;

        let req = app
            .anonymous(test::TestRequest::get().uri("/api/leave"))
            .to_request();
        assert_eq!(
            test::call_service(&svc, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let forged = token_for(EMPLOYEE, "not-the-secret");
        let req = app
            .anonymous(test::TestRequest::get().uri("/api/leave"))
            .insert_header(("Authorization", format!("Bearer {forged}")))
            .to_request();
        assert_eq!(
            test::call_service(&svc, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
