//! PostgreSQL implementation of UserStatsRepository

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use actionable_core::entities::{StatKind, UserStats, ACTIONABLE_ACTION_TYPE_ID};
use actionable_core::traits::{RepoResult, UserStatsRepository};
use actionable_core::value_objects::UserId;

use crate::models::UserStatsModel;

use super::error::map_db_error;

/// Upsert a signed delta into one aggregate column, flooring at zero
pub(crate) async fn adjust_with<'e, E>(
    executor: E,
    user_id: UserId,
    kind: StatKind,
    delta: i32,
) -> RepoResult<()>
where
    E: PgExecutor<'e>,
{
    let column = kind.column();
    let sql = format!(
        r"
        INSERT INTO user_stats (user_id, {column})
        VALUES ($1, GREATEST($2, 0))
        ON CONFLICT (user_id) DO UPDATE
        SET {column} = GREATEST(user_stats.{column} + $2, 0),
            updated_at = NOW()
        "
    );

    sqlx::query(&sql)
        .bind(user_id.into_inner())
        .bind(delta)
        .execute(executor)
        .await
        .map_err(map_db_error)?;

    Ok(())
}

/// PostgreSQL implementation of UserStatsRepository
#[derive(Clone)]
pub struct PgUserStatsRepository {
    pool: PgPool,
}

impl PgUserStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStatsRepository for PgUserStatsRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: UserId) -> RepoResult<UserStats> {
        let result = sqlx::query_as::<_, UserStatsModel>(
            r"
            SELECT user_id, actionable_given, actionable_received
            FROM user_stats
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map_or_else(|| UserStats::new(user_id), UserStats::from))
    }

    #[instrument(skip(self))]
    async fn reconcile(&self, user_id: UserId) -> RepoResult<UserStats> {
        let model = sqlx::query_as::<_, UserStatsModel>(
            r"
            INSERT INTO user_stats (user_id, actionable_given, actionable_received)
            SELECT $1,
                   (SELECT COUNT(*)
                    FROM post_actions
                    WHERE user_id = $1 AND post_action_type_id = $2 AND status = 'active')::INT,
                   (SELECT COUNT(*)
                    FROM post_actions pa
                    JOIN posts p ON p.id = pa.post_id
                    WHERE p.user_id = $1 AND pa.post_action_type_id = $2 AND pa.status = 'active')::INT
            ON CONFLICT (user_id) DO UPDATE
            SET actionable_given = EXCLUDED.actionable_given,
                actionable_received = EXCLUDED.actionable_received,
                updated_at = NOW()
            RETURNING user_id, actionable_given, actionable_received
            ",
        )
        .bind(user_id.into_inner())
        .bind(ACTIONABLE_ACTION_TYPE_ID)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(UserStats::from(model))
    }
}
