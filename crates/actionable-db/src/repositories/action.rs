//! PostgreSQL implementation of ActionRepository
//!
//! Reads go through the pool. Toggles run inside a [`PgActionUnitOfWork`]
//! that owns one transaction and commits it explicitly; dropping it rolls back.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use actionable_core::entities::{
    ActionRecord, ActionStatus, ActivityItem, ActorSummary, StatKind, UserCount,
    ACTIONABLE_ACTION_TYPE_ID,
};
use actionable_core::error::DomainError;
use actionable_core::traits::{
    ActionRepository, ActionUnitOfWork, ActivityKind, ActivityQuery, DirectoryQuery, RepoResult,
};
use actionable_core::value_objects::{ActionId, PostId, UserId};

use crate::models::{ActivityModel, ActorModel, PostActionModel, UserCountModel};

use super::daily_quota::{decrement_with, try_increment_with};
use super::error::{map_db_error, map_unique_violation, post_not_found};
use super::user_stats::adjust_with;

const ACTION_COLUMNS: &str =
    "id, post_id, user_id, post_action_type_id, status, created_at, deleted_at";

/// PostgreSQL implementation of ActionRepository
#[derive(Clone)]
pub struct PgActionRepository {
    pool: PgPool,
}

impl PgActionRepository {
    /// Create a new PgActionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, user_id: UserId, post_id: PostId, active_only: bool) -> RepoResult<Option<ActionRecord>> {
        let status_filter = if active_only { "AND status = 'active'" } else { "" };
        let sql = format!(
            r"
            SELECT {ACTION_COLUMNS}
            FROM post_actions
            WHERE user_id = $1 AND post_id = $2 AND post_action_type_id = $3 {status_filter}
            ORDER BY id DESC
            LIMIT 1
            "
        );

        let result = sqlx::query_as::<_, PostActionModel>(&sql)
            .bind(user_id.into_inner())
            .bind(post_id.into_inner())
            .bind(ACTIONABLE_ACTION_TYPE_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(ActionRecord::try_from).transpose()
    }

    async fn leaderboard(&self, sql: &str, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>> {
        let rows = sqlx::query_as::<_, UserCountModel>(sql)
            .bind(user_id.into_inner())
            .bind(ACTIONABLE_ACTION_TYPE_ID)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserCount::from).collect())
    }
}

#[async_trait]
impl ActionRepository for PgActionRepository {
    #[instrument(skip(self))]
    async fn find_active(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<ActionRecord>> {
        self.find_one(user_id, post_id, true).await
    }

    #[instrument(skip(self))]
    async fn find_latest(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<ActionRecord>> {
        self.find_one(user_id, post_id, false).await
    }

    #[instrument(skip(self))]
    async fn find_actors(&self, post_id: PostId, limit: i64) -> RepoResult<Vec<ActorSummary>> {
        let limit = limit.clamp(1, 100);

        let rows = sqlx::query_as::<_, ActorModel>(
            r"
            SELECT u.id, u.username
            FROM post_actions pa
            JOIN users u ON u.id = pa.user_id
            WHERE pa.post_id = $1 AND pa.post_action_type_id = $2 AND pa.status = 'active'
            ORDER BY pa.created_at, pa.id
            LIMIT $3
            ",
        )
        .bind(post_id.into_inner())
        .bind(ACTIONABLE_ACTION_TYPE_ID)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ActorSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn top_actors_for(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>> {
        self.leaderboard(
            r"
            SELECT u.id, u.username, COUNT(*) AS count
            FROM post_actions pa
            JOIN posts p ON p.id = pa.post_id
            JOIN users u ON u.id = pa.user_id
            WHERE p.user_id = $1 AND pa.post_action_type_id = $2 AND pa.status = 'active'
              AND p.deleted_at IS NULL
            GROUP BY u.id, u.username
            ORDER BY count DESC, u.id ASC
            LIMIT $3
            ",
            user_id,
            limit,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn top_recipients_of(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>> {
        self.leaderboard(
            r"
            SELECT u.id, u.username, COUNT(*) AS count
            FROM post_actions pa
            JOIN posts p ON p.id = pa.post_id
            JOIN users u ON u.id = p.user_id
            WHERE pa.user_id = $1 AND pa.post_action_type_id = $2 AND pa.status = 'active'
              AND p.deleted_at IS NULL
            GROUP BY u.id, u.username
            ORDER BY count DESC, u.id ASC
            LIMIT $3
            ",
            user_id,
            limit,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn directory(&self, query: &DirectoryQuery) -> RepoResult<Vec<UserCount>> {
        let ranked_column = match query.kind {
            ActivityKind::Given => "pa.user_id",
            ActivityKind::Received => "p.user_id",
        };
        let sql = format!(
            r"
            SELECT u.id, u.username, COUNT(*) AS count
            FROM post_actions pa
            JOIN posts p ON p.id = pa.post_id
            JOIN users u ON u.id = {ranked_column}
            WHERE pa.post_action_type_id = $1
              AND pa.status = 'active'
              AND p.deleted_at IS NULL
              AND u.active AND u.id > 0
              AND ($2::TIMESTAMPTZ IS NULL OR pa.created_at > $2)
            GROUP BY u.id, u.username
            ORDER BY count DESC, u.id ASC
            LIMIT $3
            "
        );

        let rows = sqlx::query_as::<_, UserCountModel>(&sql)
            .bind(ACTIONABLE_ACTION_TYPE_ID)
            .bind(query.since)
            .bind(query.limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn activity(&self, query: &ActivityQuery) -> RepoResult<Vec<ActivityItem>> {
        let owner_column = match query.kind {
            ActivityKind::Given => "pa.user_id",
            ActivityKind::Received => "p.user_id",
        };
        let sql = format!(
            r"
            SELECT pa.id, pa.post_id, p.topic_id,
                   pa.user_id AS acting_user_id, p.user_id AS target_user_id,
                   pa.created_at
            FROM post_actions pa
            JOIN posts p ON p.id = pa.post_id
            WHERE {owner_column} = $1
              AND pa.post_action_type_id = $2
              AND pa.status = 'active'
              AND ($3::BIGINT IS NULL OR pa.id < $3)
            ORDER BY pa.id DESC
            LIMIT $4
            "
        );

        let rows = sqlx::query_as::<_, ActivityModel>(&sql)
            .bind(query.user_id.into_inner())
            .bind(ACTIONABLE_ACTION_TYPE_ID)
            .bind(query.before.map(ActionId::into_inner))
            .bind(query.limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ActivityItem::from).collect())
    }

    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn ActionUnitOfWork>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgActionUnitOfWork { tx }))
    }
}

/// One toggle's worth of writes inside a single transaction
pub struct PgActionUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ActionUnitOfWork for PgActionUnitOfWork {
    #[instrument(skip(self))]
    async fn insert_action(
        &mut self,
        user_id: UserId,
        post_id: PostId,
        at: DateTime<Utc>,
    ) -> RepoResult<ActionRecord> {
        let sql = format!(
            r"
            INSERT INTO post_actions (post_id, user_id, post_action_type_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ACTION_COLUMNS}
            "
        );

        let model = sqlx::query_as::<_, PostActionModel>(&sql)
            .bind(post_id.into_inner())
            .bind(user_id.into_inner())
            .bind(ACTIONABLE_ACTION_TYPE_ID)
            .bind(ActionStatus::Active.as_str())
            .bind(at)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::AlreadyActive))?;

        ActionRecord::try_from(model)
    }

    #[instrument(skip(self))]
    async fn remove_action(&mut self, id: ActionId, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE post_actions
            SET status = $2, deleted_at = $3
            WHERE id = $1 AND status = 'active'
            ",
        )
        .bind(id.into_inner())
        .bind(ActionStatus::Removed.as_str())
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn try_increment_daily(
        &mut self,
        user_id: UserId,
        day: NaiveDate,
        limit: i32,
    ) -> RepoResult<Option<i32>> {
        try_increment_with(&mut *self.tx, user_id, day, limit).await
    }

    async fn decrement_daily(&mut self, user_id: UserId, day: NaiveDate) -> RepoResult<Option<i32>> {
        decrement_with(&mut *self.tx, user_id, day).await
    }

    async fn adjust_stat(&mut self, user_id: UserId, kind: StatKind, delta: i32) -> RepoResult<()> {
        adjust_with(&mut *self.tx, user_id, kind, delta).await
    }

    #[instrument(skip(self))]
    async fn refresh_post_count(&mut self, post_id: PostId) -> RepoResult<i32> {
        let count = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE posts
            SET actionable_count = (
                SELECT COUNT(*)
                FROM post_actions
                WHERE post_id = $1 AND post_action_type_id = $2 AND status = 'active'
            )::INT
            WHERE id = $1
            RETURNING actionable_count
            ",
        )
        .bind(post_id.into_inner())
        .bind(ACTIONABLE_ACTION_TYPE_ID)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        count.ok_or_else(|| post_not_found(post_id))
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
