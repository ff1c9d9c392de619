//! Health check endpoint.

use actix_web::{HttpResponse, web};
use inkwell_shared::ApiResponse;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.storage.is_healthy().await;

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage.name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(ApiResponse::ok(response))
    } else {
        HttpResponse::ServiceUnavailable().json(ApiResponse::ok(response))
    }
}
