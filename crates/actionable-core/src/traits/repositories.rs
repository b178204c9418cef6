//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    ActionRecord, ActivityItem, ActorSummary, Post, StatKind, User, UserCount, UserStats,
    UserSummary,
};
use crate::error::DomainError;
use crate::events::DomainEvent;
use crate::value_objects::{ActionId, PostId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Host Lookups
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID, including soft-deleted posts
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>>;
}

// ============================================================================
// Action Records
// ============================================================================

/// Direction of an activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Records the user authored
    Given,
    /// Records on the user's posts
    Received,
}

/// Cursor query for activity feeds (newest first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub user_id: UserId,
    pub kind: ActivityKind,
    pub limit: i64,
    /// Only return records with an id lower than this
    pub before: Option<ActionId>,
}

/// Rolling window a directory ranking counts over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    #[default]
    All,
}

impl DirectoryPeriod {
    /// Start of the window ending at `now`; `None` means unbounded
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Daily => Some(now - Duration::days(1)),
            Self::Weekly => Some(now - Duration::weeks(1)),
            Self::Monthly => now.checked_sub_months(Months::new(1)),
            Self::Quarterly => now.checked_sub_months(Months::new(3)),
            Self::Yearly => now.checked_sub_months(Months::new(12)),
            Self::All => None,
        }
    }
}

/// Ranking of users by marks given or received inside a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub kind: ActivityKind,
    /// Only count records created after this instant
    pub since: Option<DateTime<Utc>>,
    pub limit: i64,
}

#[async_trait]
pub trait ActionRepository: Send + Sync {
    /// Find the active record for (user, post)
    async fn find_active(&self, user_id: UserId, post_id: PostId)
        -> RepoResult<Option<ActionRecord>>;

    /// Find the most recent record for (user, post), active or removed
    async fn find_latest(&self, user_id: UserId, post_id: PostId)
        -> RepoResult<Option<ActionRecord>>;

    /// Authors of active records on a post, oldest first
    async fn find_actors(&self, post_id: PostId, limit: i64) -> RepoResult<Vec<ActorSummary>>;

    /// Users who marked `user_id`'s posts most often
    async fn top_actors_for(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>>;

    /// Users whose posts `user_id` marked most often
    async fn top_recipients_of(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>>;

    /// Active users ranked by active records in the window, count desc then id asc
    ///
    /// Records on deleted posts are not counted and users with no records are omitted.
    async fn directory(&self, query: &DirectoryQuery) -> RepoResult<Vec<UserCount>>;

    /// Activity feed for a user
    async fn activity(&self, query: &ActivityQuery) -> RepoResult<Vec<ActivityItem>>;

    /// Start a unit of work; nothing it does is visible until `commit`
    async fn begin(&self) -> RepoResult<Box<dyn ActionUnitOfWork>>;
}

/// Transactional unit of work for a single toggle
///
/// Dropping the unit of work without calling `commit` discards every change.
#[async_trait]
pub trait ActionUnitOfWork: Send {
    /// Insert a new active record
    ///
    /// Fails with `DomainError::AlreadyActive` if one already exists for the pair.
    async fn insert_action(
        &mut self,
        user_id: UserId,
        post_id: PostId,
        at: DateTime<Utc>,
    ) -> RepoResult<ActionRecord>;

    /// Soft-delete an active record; returns false if it was not active
    async fn remove_action(&mut self, id: ActionId, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Increment the (user, day) counter only while it is below `limit`
    ///
    /// Returns the new count, or `None` when the limit was already reached.
    async fn try_increment_daily(
        &mut self,
        user_id: UserId,
        day: NaiveDate,
        limit: i32,
    ) -> RepoResult<Option<i32>>;

    /// Decrement the (user, day) counter if positive; `None` when nothing changed
    async fn decrement_daily(&mut self, user_id: UserId, day: NaiveDate)
        -> RepoResult<Option<i32>>;

    /// Apply a signed delta to one aggregate, flooring at zero
    async fn adjust_stat(&mut self, user_id: UserId, kind: StatKind, delta: i32) -> RepoResult<()>;

    /// Recompute and persist the post's denormalized count
    async fn refresh_post_count(&mut self, post_id: PostId) -> RepoResult<i32>;

    /// Commit every change made through this unit of work
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

// ============================================================================
// Daily Quota
// ============================================================================

#[async_trait]
pub trait DailyQuotaRepository: Send + Sync {
    /// Increment the (user, day) counter, creating it at 1 if absent
    async fn increment(&self, user_id: UserId, day: NaiveDate) -> RepoResult<i32>;

    /// Increment only while below `limit`; `None` when the limit was reached
    async fn try_increment(&self, user_id: UserId, day: NaiveDate, limit: i32)
        -> RepoResult<Option<i32>>;

    /// Decrement if positive; `None` when absent or already zero
    async fn decrement(&self, user_id: UserId, day: NaiveDate) -> RepoResult<Option<i32>>;

    /// Current count, zero when no row exists
    async fn count(&self, user_id: UserId, day: NaiveDate) -> RepoResult<i32>;

    /// Delete every row dated strictly before `cutoff`
    async fn purge_before(&self, cutoff: NaiveDate) -> RepoResult<u64>;
}

// ============================================================================
// User Stats
// ============================================================================

#[async_trait]
pub trait UserStatsRepository: Send + Sync {
    /// Current aggregates, zeros when the user has no stats row
    async fn find(&self, user_id: UserId) -> RepoResult<UserStats>;

    /// Recompute both aggregates from active records and persist them
    async fn reconcile(&self, user_id: UserId) -> RepoResult<UserStats>;
}

// ============================================================================
// Side Channels
// ============================================================================

/// Real-time fanout of domain events to connected clients
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the topic's channel
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()>;

    /// Check that the bus is reachable
    async fn ping(&self) -> RepoResult<()>;
}

/// Short-lived cache of user summaries
#[async_trait]
pub trait SummaryCache: Send + Sync {
    async fn get(&self, user_id: UserId) -> RepoResult<Option<UserSummary>>;

    async fn put(&self, summary: &UserSummary) -> RepoResult<()>;

    /// Drop cached summaries for the given users
    async fn invalidate(&self, user_ids: &[UserId]) -> RepoResult<()>;
}

/// Liveness check for the primary store
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> RepoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_directory_period_windows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

        assert_eq!(
            DirectoryPeriod::Daily.since(now),
            Some(Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap())
        );
        assert_eq!(
            DirectoryPeriod::Weekly.since(now),
            Some(Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap())
        );
        // Clamped to the last day of a shorter month
        assert_eq!(
            DirectoryPeriod::Monthly.since(now),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap())
        );
        assert_eq!(
            DirectoryPeriod::Quarterly.since(now),
            Some(Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap())
        );
        assert_eq!(
            DirectoryPeriod::Yearly.since(now),
            Some(Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap())
        );
        assert_eq!(DirectoryPeriod::All.since(now), None);
    }

    #[test]
    fn test_directory_period_parses_lowercase() {
        let period: DirectoryPeriod = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(period, DirectoryPeriod::Quarterly);
        assert_eq!(DirectoryPeriod::default(), DirectoryPeriod::All);
        assert!(serde_json::from_str::<DirectoryPeriod>("\"hourly\"").is_err());
    }
}
