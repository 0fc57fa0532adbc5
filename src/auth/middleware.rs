use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web::Data,
};
use serde_json::{Value, json};

/// Verifies the bearer token of every request in the API scope and stores
/// the caller as an [`AuthUser`] extension.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let secret = match req.app_data::<Data<Config>>() {
        Some(config) => config.jwt_secret.clone(),
        None => return Err(actix_web::error::ErrorInternalServerError("App config missing")),
    };

    let verified = bearer_token(&req).and_then(|token| {
        verify_token(token, &secret).map_err(|details| {
            tracing::debug!(error = %details, "Rejected bearer token");
            json!({"error": "Invalid or expired token", "details": details})
        })
    });

    match verified {
        Ok(claims) => {
            req.extensions_mut().insert(AuthUser {
                user_id: claims.user_id,
                name: claims.sub,
            });
            next.call(req).await
        }
        Err(body) => Ok(req.into_response(HttpResponse::Unauthorized().json(body))),
    }
}

fn bearer_token(req: &ServiceRequest) -> Result<&str, Value> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| json!({"error": "Missing Authorization header"}))?;
    let value = header
        .to_str()
        .map_err(|_| json!({"error": "Invalid Authorization header encoding"}))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| json!({"error": "Authorization header must start with Bearer"}))
}
