//! Post action database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for post_actions table
#[derive(Debug, Clone, FromRow)]
pub struct PostActionModel {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub post_action_type_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Activity feed row: a record joined with its post
#[derive(Debug, Clone, FromRow)]
pub struct ActivityModel {
    pub id: i64,
    pub post_id: i64,
    pub topic_id: i64,
    pub acting_user_id: i64,
    pub target_user_id: i64,
    pub created_at: DateTime<Utc>,
}
