use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::error;

use crate::api::state::AppState;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl HealthResponse {
    fn new(status: &str, storage: &str, error: Option<String>) -> Self {
        Self {
            status: status.to_string(),
            storage: storage.to_string(),
            error,
        }
    }
}

/// Health check endpoint
///
/// General health check including a storage round trip. Failure details
/// go to the log only.
#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.identity.registered_users().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse::new("healthy", "connected", None)),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::new(
                "unhealthy",
                "disconnected",
                Some("Storage error occurred".to_string()),
            ))
        }
    }
}

/// Readiness check endpoint
///
/// Returns 503 while storage is unavailable; the process recovers on its own
/// once it comes back.
#[get("/ready")]
async fn readiness_check(state: web::Data<AppState>) -> impl Responder {
    match state.identity.registered_users().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse::new("ready", "connected", None)),
        Err(e) => {
            error!("Readiness check failed: storage unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::new(
                "not_ready",
                "disconnected",
                Some("Storage unavailable".to_string()),
            ))
        }
    }
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::new("alive", "not_checked", None))
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
