//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use actionable_core::entities::Post;
use actionable_core::traits::{PostRepository, RepoResult};
use actionable_core::value_objects::PostId;

use crate::models::PostModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT p.id, p.topic_id, p.user_id, p.deleted_at,
                   t.archived AS topic_archived, t.closed AS topic_closed,
                   p.actionable_count
            FROM posts p
            JOIN topics t ON t.id = p.topic_id
            WHERE p.id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }
}
