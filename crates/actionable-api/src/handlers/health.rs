//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use actionable_service::{HealthResponse, ReadinessResponse};
use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    // Check database connectivity
    let db_healthy = match ctx.health_probe().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database readiness check failed");
            false
        }
    };

    // Check Redis connectivity
    let redis_healthy = match ctx.publisher().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Redis readiness check failed");
            false
        }
    };

    let response = ReadinessResponse::ready(db_healthy, redis_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
