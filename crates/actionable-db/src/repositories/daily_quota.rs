//! PostgreSQL implementation of DailyQuotaRepository
//!
//! Every mutation is a single statement, so concurrent callers serialize on
//! the `(user_id, actionable_date)` row lock and never lose an update. The
//! statement helpers take any executor so the toggle transaction can reuse them.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use actionable_core::traits::{DailyQuotaRepository, RepoResult};
use actionable_core::value_objects::UserId;

use super::error::map_db_error;

pub(crate) async fn increment_with<'e, E>(executor: E, user_id: UserId, day: NaiveDate) -> RepoResult<i32>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO actionable_daily (user_id, actionable_date, actionable_count)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, actionable_date) DO UPDATE
        SET actionable_count = actionable_daily.actionable_count + 1,
            updated_at = NOW()
        RETURNING actionable_count
        ",
    )
    .bind(user_id.into_inner())
    .bind(day)
    .fetch_one(executor)
    .await
    .map_err(map_db_error)
}

pub(crate) async fn try_increment_with<'e, E>(
    executor: E,
    user_id: UserId,
    day: NaiveDate,
    limit: i32,
) -> RepoResult<Option<i32>>
where
    E: PgExecutor<'e>,
{
    // A fresh insert would bypass the conflict guard below
    if limit <= 0 {
        return Ok(None);
    }

    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO actionable_daily (user_id, actionable_date, actionable_count)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, actionable_date) DO UPDATE
        SET actionable_count = actionable_daily.actionable_count + 1,
            updated_at = NOW()
        WHERE actionable_daily.actionable_count < $3
        RETURNING actionable_count
        ",
    )
    .bind(user_id.into_inner())
    .bind(day)
    .bind(limit)
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)
}

pub(crate) async fn decrement_with<'e, E>(
    executor: E,
    user_id: UserId,
    day: NaiveDate,
) -> RepoResult<Option<i32>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i32>(
        r"
        UPDATE actionable_daily
        SET actionable_count = actionable_count - 1,
            updated_at = NOW()
        WHERE user_id = $1 AND actionable_date = $2 AND actionable_count > 0
        RETURNING actionable_count
        ",
    )
    .bind(user_id.into_inner())
    .bind(day)
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)
}

/// PostgreSQL implementation of DailyQuotaRepository
#[derive(Clone)]
pub struct PgDailyQuotaRepository {
    pool: PgPool,
}

impl PgDailyQuotaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyQuotaRepository for PgDailyQuotaRepository {
    #[instrument(skip(self))]
    async fn increment(&self, user_id: UserId, day: NaiveDate) -> RepoResult<i32> {
        increment_with(&self.pool, user_id, day).await
    }

    #[instrument(skip(self))]
    async fn try_increment(
        &self,
        user_id: UserId,
        day: NaiveDate,
        limit: i32,
    ) -> RepoResult<Option<i32>> {
        try_increment_with(&self.pool, user_id, day, limit).await
    }

    #[instrument(skip(self))]
    async fn decrement(&self, user_id: UserId, day: NaiveDate) -> RepoResult<Option<i32>> {
        decrement_with(&self.pool, user_id, day).await
    }

    #[instrument(skip(self))]
    async fn count(&self, user_id: UserId, day: NaiveDate) -> RepoResult<i32> {
        let count = sqlx::query_scalar::<_, i32>(
            r"
            SELECT actionable_count
            FROM actionable_daily
            WHERE user_id = $1 AND actionable_date = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(day)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn purge_before(&self, cutoff: NaiveDate) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM actionable_daily WHERE actionable_date < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
