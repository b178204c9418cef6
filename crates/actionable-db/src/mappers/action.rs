//! Action record <-> model mappers

use actionable_core::entities::{ActionRecord, ActionStatus, ActivityItem};
use actionable_core::error::DomainError;
use actionable_core::value_objects::{ActionId, PostId, TopicId, UserId};

use crate::models::{ActivityModel, PostActionModel};

impl TryFrom<PostActionModel> for ActionRecord {
    type Error = DomainError;

    fn try_from(model: PostActionModel) -> Result<Self, Self::Error> {
        let status = ActionStatus::parse(&model.status).ok_or_else(|| {
            DomainError::Database(format!(
                "post action {} has unknown status {:?}",
                model.id, model.status
            ))
        })?;

        Ok(ActionRecord {
            id: ActionId::new(model.id),
            user_id: UserId::new(model.user_id),
            post_id: PostId::new(model.post_id),
            status,
            created_at: model.created_at,
            deleted_at: model.deleted_at,
        })
    }
}

impl From<ActivityModel> for ActivityItem {
    fn from(model: ActivityModel) -> Self {
        ActivityItem {
            action_id: ActionId::new(model.id),
            post_id: PostId::new(model.post_id),
            topic_id: TopicId::new(model.topic_id),
            acting_user_id: UserId::new(model.acting_user_id),
            target_user_id: UserId::new(model.target_user_id),
            created_at: model.created_at,
        }
    }
}
