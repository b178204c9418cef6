//! Post entity - the target resource of an actionable mark

use serde::{Deserialize, Serialize};

use crate::value_objects::{PostId, TopicId, UserId};

/// Post entity with the state relevant to actionable marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub topic_id: TopicId,
    /// Post author
    pub user_id: UserId,
    pub deleted: bool,
    pub topic_archived: bool,
    pub topic_closed: bool,
    /// Denormalized count of active actionable marks
    pub actionable_count: i32,
}

impl Post {
    /// Create a new live post with no marks
    pub fn new(id: PostId, topic_id: TopicId, user_id: UserId) -> Self {
        Self {
            id,
            topic_id,
            user_id,
            deleted: false,
            topic_archived: false,
            topic_closed: false,
            actionable_count: 0,
        }
    }

    /// Check if the post is owned by the given user
    #[inline]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// A post is unavailable once deleted or when its topic is archived or closed
    pub fn is_unavailable(&self) -> bool {
        self.deleted || self.topic_archived || self.topic_closed
    }
}
