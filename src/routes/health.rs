use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Reports the service identity, its status and the current timestamp.
/// Unauthenticated, so load balancers and uptime probes can hit it freely.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "service": "todo-api",
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
