//! Post entity <-> model mapper

use actionable_core::entities::Post;
use actionable_core::value_objects::{PostId, TopicId, UserId};

use crate::models::PostModel;

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::new(model.id),
            topic_id: TopicId::new(model.topic_id),
            user_id: UserId::new(model.user_id),
            deleted: model.is_deleted(),
            topic_archived: model.topic_archived,
            topic_closed: model.topic_closed,
            actionable_count: model.actionable_count,
        }
    }
}
