use actix_web::{Responder, get};

#[get("/")]
pub async fn index() -> impl Responder {
    "Leave Management Backend Running"
}

#[get("/health")]
pub async fn health() -> impl Responder {
    "OK"
}
