//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A post joined with its topic's state
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub topic_id: i64,
    pub user_id: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub topic_archived: bool,
    pub topic_closed: bool,
    pub actionable_count: i32,
}

impl PostModel {
    /// Check if post is soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
