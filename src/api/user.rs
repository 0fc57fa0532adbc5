use crate::auth::auth::AuthUser;
use crate::leave::RequestService;
use actix_web::{HttpResponse, Responder, web};

/// Profile and leave balances of the caller
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn me(
    auth: AuthUser,
    service: web::Data<RequestService>,
) -> actix_web::Result<impl Responder> {
    let user = service.profile(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestApp;
    use crate::routes::build_app;
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn me_reports_current_balances() {
        let app = TestApp::seeded().await;
        let svc =
            test::init_service(build_app(app.config.clone(), app.service.clone())).await;

        let req = app
            .request(test::TestRequest::get().uri("/api/me"), 1)
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(
            body,
            json!({
                "id": 1,
                "name": "Employee One",
                "role": "employee",
                "paid_leave": 30,
                "unpaid_leave": 0
            })
        );
    }
}
