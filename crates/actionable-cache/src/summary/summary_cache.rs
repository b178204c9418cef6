//! Redis-backed [`SummaryCache`].
//!
//! Summaries are derived data; entries expire on their own and are dropped
//! eagerly whenever a toggle touches either side of the pair.

use async_trait::async_trait;

use actionable_core::traits::{RepoResult, SummaryCache};
use actionable_core::{UserId, UserSummary};

use crate::pool::RedisPool;

/// Key prefix for cached summaries
pub const SUMMARY_KEY_PREFIX: &str = "actionable:summary:";

/// Redis key for a user's summary
#[must_use]
pub fn summary_key(user_id: UserId) -> String {
    format!("{SUMMARY_KEY_PREFIX}{user_id}")
}

/// Summary cache with a fixed TTL
#[derive(Clone)]
pub struct RedisSummaryCache {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSummaryCache {
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }
}

#[async_trait]
impl SummaryCache for RedisSummaryCache {
    async fn get(&self, user_id: UserId) -> RepoResult<Option<UserSummary>> {
        Ok(self.pool.get_value(&summary_key(user_id)).await?)
    }

    async fn put(&self, summary: &UserSummary) -> RepoResult<()> {
        self.pool
            .set(&summary_key(summary.user_id), summary, Some(self.ttl_seconds))
            .await?;
        Ok(())
    }

    async fn invalidate(&self, user_ids: &[UserId]) -> RepoResult<()> {
        let keys: Vec<String> = user_ids.iter().copied().map(summary_key).collect();
        let deleted = self.pool.delete_many(&keys).await?;
        tracing::debug!(users = user_ids.len(), deleted, "Invalidated cached summaries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_key() {
        assert_eq!(summary_key(UserId::new(12)), "actionable:summary:12");
    }
}
