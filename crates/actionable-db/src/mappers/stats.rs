//! Stats and summary row mappers

use actionable_core::entities::{ActorSummary, UserCount, UserStats};
use actionable_core::value_objects::UserId;

use crate::models::{ActorModel, UserCountModel, UserStatsModel};

impl From<UserStatsModel> for UserStats {
    fn from(model: UserStatsModel) -> Self {
        UserStats {
            user_id: UserId::new(model.user_id),
            actionable_given: model.actionable_given,
            actionable_received: model.actionable_received,
        }
    }
}

impl From<UserCountModel> for UserCount {
    fn from(model: UserCountModel) -> Self {
        UserCount {
            id: UserId::new(model.id),
            username: model.username,
            count: model.count,
        }
    }
}

impl From<ActorModel> for ActorSummary {
    fn from(model: ActorModel) -> Self {
        ActorSummary {
            id: UserId::new(model.id),
            username: model.username,
        }
    }
}
