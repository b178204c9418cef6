//! Read models for listings and user summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ActionId, PostId, TopicId, UserId};

/// Minimal user reference for "who actioned" listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSummary {
    pub id: UserId,
    pub username: String,
}

/// A user paired with a count, for "most actioned by" style rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    pub id: UserId,
    pub username: String,
    pub count: i64,
}

/// One entry in a user's given/received activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub action_id: ActionId,
    pub post_id: PostId,
    pub topic_id: TopicId,
    pub acting_user_id: UserId,
    pub target_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Profile summary of a user's actionable activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub actionable_given: i32,
    pub actionable_received: i32,
    /// Users who marked this user's posts most often
    pub most_actionabled_by_users: Vec<UserCount>,
    /// Users whose posts this user marked most often
    pub most_actionabled_users: Vec<UserCount>,
}
