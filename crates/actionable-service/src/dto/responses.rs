//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Identifiers serialize as plain numbers, matching the host platform.

use actionable_core::{ActionId, ActivityKind, DirectoryPeriod, PostId, TopicId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Cursor-paginated response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, before: Option<ActionId>, has_more: bool, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                before,
                has_more,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for the next page; pass as `before`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<ActionId>,
    pub has_more: bool,
    pub limit: i64,
}

// ============================================================================
// Toggle Responses
// ============================================================================

/// Successful create or destroy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub acted: bool,
    pub actionable_count: i32,
    pub can_undo_actionable: bool,
}

/// Rejected create or destroy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleFailure {
    pub success: bool,
    pub errors: Vec<String>,
}

impl ToggleFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![reason.into()],
        }
    }
}

/// Per-post state as seen by one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionableStateResponse {
    pub actionable_count: i32,
    pub actioned: bool,
    pub can_undo_actionable: bool,
    pub can_toggle_actionable: bool,
    pub show_actionable: bool,
}

// ============================================================================
// Listing Responses
// ============================================================================

/// Entry in a "who actioned" list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorResponse {
    pub id: UserId,
    pub username: String,
}

/// Entry in a summary ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCountResponse {
    pub id: UserId,
    pub username: String,
    pub count: i64,
}

/// Profile summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummaryResponse {
    pub user_id: UserId,
    pub actionable_given: i32,
    pub actionable_received: i32,
    pub most_actionabled_by_users: Vec<UserCountResponse>,
    pub most_actionabled_users: Vec<UserCountResponse>,
}

/// Users ranked by marks given or received in a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryResponse {
    pub period: DirectoryPeriod,
    pub kind: ActivityKind,
    pub users: Vec<UserCountResponse>,
}

/// Entry in a given/received activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItemResponse {
    pub id: ActionId,
    pub post_id: PostId,
    pub topic_id: TopicId,
    pub acting_user_id: UserId,
    pub target_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Aggregate totals for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserStatsResponse {
    pub user_id: UserId,
    pub actionable_given: i32,
    pub actionable_received: i32,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
