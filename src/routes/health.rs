use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Root endpoint
///
/// Returns a fixed welcome message.
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Welcome to the Todo API" }))
}

/// Health check endpoint
///
/// Returns the liveness status of the API and the current timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now()
    }))
}
