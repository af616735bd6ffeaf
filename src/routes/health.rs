use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Readiness probe: `{"status": "ok", "timestamp": <RFC 3339>}`.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

/// Liveness probe answering a plain-text `Pong`.
#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Pong")
}
