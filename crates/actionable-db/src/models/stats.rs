//! Aggregate and summary row models

use sqlx::FromRow;

/// Database model for user_stats table
#[derive(Debug, Clone, FromRow)]
pub struct UserStatsModel {
    pub user_id: i64,
    pub actionable_given: i32,
    pub actionable_received: i32,
}

/// `(user, username, count)` row from the summary leaderboards
#[derive(Debug, Clone, FromRow)]
pub struct UserCountModel {
    pub id: i64,
    pub username: String,
    pub count: i64,
}

/// `(user, username)` row for actor listings
#[derive(Debug, Clone, FromRow)]
pub struct ActorModel {
    pub id: i64,
    pub username: String,
}
