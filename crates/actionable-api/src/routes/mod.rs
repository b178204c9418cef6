//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{actionable, health};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(toggle_routes())
        .merge(user_routes())
        .merge(admin_routes())
}

/// Per-post routes
fn toggle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/actionable/:post_id",
            get(actionable::get_status)
                .post(actionable::create_actionable)
                .delete(actionable::destroy_actionable),
        )
        .route("/actionable/:post_id/who", get(actionable::who_actioned))
}

/// Per-user and directory read routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/actionable/users/:user_id/summary", get(actionable::user_summary))
        .route("/actionable/users/:user_id/given", get(actionable::given_activity))
        .route("/actionable/users/:user_id/received", get(actionable::received_activity))
        .route("/actionable/directory", get(actionable::directory))
}

/// Staff routes
fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/actionable/admin/users/:user_id/reconcile",
        post(actionable::reconcile_stats),
    )
}
