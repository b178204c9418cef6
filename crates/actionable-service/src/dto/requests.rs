//! Request DTOs for API endpoints
//!
//! Query strings deserialize into these and are checked with `validator`.

use actionable_core::{ActionId, ActivityKind, DirectoryPeriod, UserId};
use serde::Deserialize;
use validator::Validate;

/// Default page size for listings
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size accepted by any listing
pub const MAX_LIMIT: i64 = 100;

/// `GET /actionable/:post_id/who`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WhoActionedQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl WhoActionedQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// `GET /actionable/users/:user_id/{given,received}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityQueryParams {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,

    /// Only return records older than this action id
    pub before: Option<ActionId>,
}

impl ActivityQueryParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// `GET /actionable/directory`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DirectoryParams {
    #[serde(default)]
    pub period: DirectoryPeriod,

    /// Rank by marks given (default) or received
    pub kind: Option<ActivityKind>,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl DirectoryParams {
    pub fn kind(&self) -> ActivityKind {
        self.kind.unwrap_or(ActivityKind::Given)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// `DELETE /actionable/:post_id`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DestroyParams {
    /// Author of the record to remove; staff only when not the caller
    pub user_id: Option<UserId>,
}
