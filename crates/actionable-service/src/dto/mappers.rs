//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use actionable_core::{ActivityItem, ActorSummary, UserCount, UserStats, UserSummary};

use super::responses::{
    ActivityItemResponse, ActorResponse, UserCountResponse, UserStatsResponse, UserSummaryResponse,
};

impl From<ActorSummary> for ActorResponse {
    fn from(actor: ActorSummary) -> Self {
        Self {
            id: actor.id,
            username: actor.username,
        }
    }
}

impl From<&UserCount> for UserCountResponse {
    fn from(entry: &UserCount) -> Self {
        Self {
            id: entry.id,
            username: entry.username.clone(),
            count: entry.count,
        }
    }
}

impl From<&UserSummary> for UserSummaryResponse {
    fn from(summary: &UserSummary) -> Self {
        Self {
            user_id: summary.user_id,
            actionable_given: summary.actionable_given,
            actionable_received: summary.actionable_received,
            most_actionabled_by_users: summary
                .most_actionabled_by_users
                .iter()
                .map(UserCountResponse::from)
                .collect(),
            most_actionabled_users: summary
                .most_actionabled_users
                .iter()
                .map(UserCountResponse::from)
                .collect(),
        }
    }
}

impl From<ActivityItem> for ActivityItemResponse {
    fn from(item: ActivityItem) -> Self {
        Self {
            id: item.action_id,
            post_id: item.post_id,
            topic_id: item.topic_id,
            acting_user_id: item.acting_user_id,
            target_user_id: item.target_user_id,
            created_at: item.created_at,
        }
    }
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            user_id: stats.user_id,
            actionable_given: stats.actionable_given,
            actionable_received: stats.actionable_received,
        }
    }
}
