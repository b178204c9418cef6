//! Daily quota service
//!
//! Thin use-case layer over `DailyQuotaRepository`. All mutation goes
//! through the repository's atomic primitives; nothing here reads a count
//! and writes it back.

use actionable_core::UserId;
use chrono::{Days, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Current calendar day in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Daily quota service
pub struct DailyQuotaService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DailyQuotaService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Increment the counter for (user, day) and return the new count
    #[instrument(skip(self))]
    pub async fn increment(&self, user_id: UserId, day: NaiveDate) -> ServiceResult<i32> {
        Ok(self.ctx.quota_repo().increment(user_id, day).await?)
    }

    /// Decrement the counter for (user, day); `None` when it was already zero or absent
    #[instrument(skip(self))]
    pub async fn decrement(&self, user_id: UserId, day: NaiveDate) -> ServiceResult<Option<i32>> {
        let count = self.ctx.quota_repo().decrement(user_id, day).await?;
        if count.is_none() {
            debug!(%user_id, %day, "Quota decrement was a no-op");
        }
        Ok(count)
    }

    /// Current count for (user, day)
    #[instrument(skip(self))]
    pub async fn query(&self, user_id: UserId, day: NaiveDate) -> ServiceResult<i32> {
        Ok(self.ctx.quota_repo().count(user_id, day).await?)
    }

    /// Whether the user has marked fewer than `limit` posts today
    #[instrument(skip(self))]
    pub async fn within_limit(&self, user_id: UserId, limit: i32) -> ServiceResult<bool> {
        Ok(self.query(user_id, today()).await? < limit)
    }

    /// Delete rows older than the retention window
    #[instrument(skip(self))]
    pub async fn purge(&self, retention_days: i64) -> ServiceResult<u64> {
        let days = u64::try_from(retention_days)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| ServiceError::validation("retention_days must be at least 1"))?;

        let cutoff = today()
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| ServiceError::validation("retention_days is out of range"))?;

        let purged = self.ctx.quota_repo().purge_before(cutoff).await?;
        info!(%cutoff, purged, "Purged daily quota rows");
        Ok(purged)
    }
}
