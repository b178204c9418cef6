//! In-memory implementations of every port
//!
//! `InMemoryStore` behaves like the Postgres repositories: a unit of work
//! holds the store lock, edits a private copy, and publishes it on commit.
//! Dropping it discards the copy. Units of work are therefore serialized,
//! which is stricter than the database but keeps the same observable rules.

use std::collections::HashMap;
use std::sync::Arc;

use actionable_common::{ActionableSettings, JwtService};
use actionable_core::{
    ActionId, ActionRecord, ActionRepository, ActionUnitOfWork, ActivityItem, ActivityKind,
    ActivityQuery, ActorSummary, DailyQuotaRepository, DirectoryQuery, DomainError, DomainEvent,
    EventPublisher, HealthProbe, Post, PostId, PostRepository, RepoResult, StatKind, SummaryCache,
    User, UserCount, UserId, UserRepository, UserStats, UserStatsRepository, UserSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::services::ServiceContext;

/// Secret used to sign tokens in tests
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-actionable-tests";

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    posts: HashMap<PostId, Post>,
    actions: Vec<ActionRecord>,
    next_action_id: i64,
    daily: HashMap<(UserId, NaiveDate), i32>,
    stats: HashMap<UserId, UserStats>,
    fail_commits: bool,
    unhealthy: bool,
}

impl StoreState {
    fn username(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn owner_of(&self, post_id: PostId) -> Option<UserId> {
        self.posts.get(&post_id).map(|p| p.user_id)
    }

    /// Owner of a post that has not been deleted
    fn live_owner_of(&self, post_id: PostId) -> Option<UserId> {
        self.posts
            .get(&post_id)
            .filter(|p| !p.deleted)
            .map(|p| p.user_id)
    }

    fn active(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter().filter(|r| r.is_active())
    }

    /// Rank users by count desc, then id asc
    fn rank(&self, counts: HashMap<UserId, i64>, limit: i64) -> Vec<UserCount> {
        let mut ranked: Vec<_> = counts
            .into_iter()
            .map(|(id, count)| UserCount {
                id,
                username: self.username(id),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
        ranked.truncate(usize::try_from(limit).unwrap_or(0));
        ranked
    }

    fn try_increment(&mut self, user_id: UserId, day: NaiveDate, limit: i32) -> Option<i32> {
        if limit <= 0 {
            return None;
        }
        let count = self.daily.entry((user_id, day)).or_insert(0);
        if *count >= limit {
            return None;
        }
        *count += 1;
        Some(*count)
    }

    fn decrement(&mut self, user_id: UserId, day: NaiveDate) -> Option<i32> {
        match self.daily.get_mut(&(user_id, day)) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Some(*count)
            }
            _ => None,
        }
    }
}

/// In-memory store implementing every repository port
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }

    pub async fn add_post(&self, post: Post) {
        self.state.lock().await.posts.insert(post.id, post);
    }

    pub async fn post(&self, id: PostId) -> Option<Post> {
        self.state.lock().await.posts.get(&id).cloned()
    }

    /// Stored aggregates, zeros when absent
    pub async fn stats(&self, user_id: UserId) -> UserStats {
        self.state
            .lock()
            .await
            .stats
            .get(&user_id)
            .copied()
            .unwrap_or_else(|| UserStats::new(user_id))
    }

    /// Overwrite stored aggregates, e.g. to simulate drift
    pub async fn set_stats(&self, stats: UserStats) {
        self.state.lock().await.stats.insert(stats.user_id, stats);
    }

    pub async fn quota(&self, user_id: UserId, day: NaiveDate) -> i32 {
        self.state
            .lock()
            .await
            .daily
            .get(&(user_id, day))
            .copied()
            .unwrap_or(0)
    }

    pub async fn set_quota(&self, user_id: UserId, day: NaiveDate, count: i32) {
        self.state.lock().await.daily.insert((user_id, day), count);
    }

    /// Every record ever written, in insertion order
    pub async fn records(&self) -> Vec<ActionRecord> {
        self.state.lock().await.actions.clone()
    }

    /// Make every subsequent commit fail with a database error
    pub async fn fail_commits(&self, fail: bool) {
        self.state.lock().await.fail_commits = fail;
    }

    /// Make the health probe fail
    pub async fn set_unhealthy(&self, unhealthy: bool) {
        self.state.lock().await.unhealthy = unhealthy;
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }
}

#[async_trait]
impl ActionRepository for InMemoryStore {
    async fn find_active(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<ActionRecord>> {
        let state = self.state.lock().await;
        let found = state
            .active()
            .find(|r| r.user_id == user_id && r.post_id == post_id)
            .cloned();
        Ok(found)
    }

    async fn find_latest(&self, user_id: UserId, post_id: PostId) -> RepoResult<Option<ActionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .actions
            .iter()
            .rev()
            .find(|r| r.user_id == user_id && r.post_id == post_id)
            .cloned())
    }

    async fn find_actors(&self, post_id: PostId, limit: i64) -> RepoResult<Vec<ActorSummary>> {
        let state = self.state.lock().await;
        let limit = usize::try_from(limit.clamp(1, 100)).unwrap_or(1);
        Ok(state
            .active()
            .filter(|r| r.post_id == post_id)
            .take(limit)
            .map(|r| ActorSummary {
                id: r.user_id,
                username: state.username(r.user_id),
            })
            .collect())
    }

    async fn top_actors_for(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>> {
        let state = self.state.lock().await;
        let mut counts = HashMap::new();
        for r in state.active() {
            if state.live_owner_of(r.post_id) == Some(user_id) {
                *counts.entry(r.user_id).or_insert(0) += 1;
            }
        }
        Ok(state.rank(counts, limit))
    }

    async fn top_recipients_of(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<UserCount>> {
        let state = self.state.lock().await;
        let mut counts = HashMap::new();
        for r in state.active().filter(|r| r.user_id == user_id) {
            if let Some(owner) = state.live_owner_of(r.post_id) {
                *counts.entry(owner).or_insert(0) += 1;
            }
        }
        Ok(state.rank(counts, limit))
    }

    async fn directory(&self, query: &DirectoryQuery) -> RepoResult<Vec<UserCount>> {
        let state = self.state.lock().await;
        let mut counts = HashMap::new();
        for r in state
            .active()
            .filter(|r| query.since.is_none_or(|since| r.created_at > since))
        {
            let Some(owner) = state.live_owner_of(r.post_id) else {
                continue;
            };
            let ranked = match query.kind {
                ActivityKind::Given => r.user_id,
                ActivityKind::Received => owner,
            };
            if state.users.get(&ranked).is_some_and(|u| u.active && ranked.into_inner() > 0) {
                *counts.entry(ranked).or_insert(0) += 1;
            }
        }
        Ok(state.rank(counts, query.limit.clamp(1, 100)))
    }

    async fn activity(&self, query: &ActivityQuery) -> RepoResult<Vec<ActivityItem>> {
        let state = self.state.lock().await;
        let mut items: Vec<_> = state
            .active()
            .filter(|r| query.before.is_none_or(|before| r.id < before))
            .filter_map(|r| {
                let post = state.posts.get(&r.post_id)?;
                let matches = match query.kind {
                    ActivityKind::Given => r.user_id == query.user_id,
                    ActivityKind::Received => post.user_id == query.user_id,
                };
                matches.then(|| ActivityItem {
                    action_id: r.id,
                    post_id: r.post_id,
                    topic_id: post.topic_id,
                    acting_user_id: r.user_id,
                    target_user_id: post.user_id,
                    created_at: r.created_at,
                })
            })
            .collect();
        items.sort_by(|a, b| b.action_id.cmp(&a.action_id));
        items.truncate(usize::try_from(query.limit).unwrap_or(0));
        Ok(items)
    }

    async fn begin(&self) -> RepoResult<Box<dyn ActionUnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, working }))
    }
}

/// Unit of work over a private copy of the store
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

#[async_trait]
impl ActionUnitOfWork for InMemoryUnitOfWork {
    async fn insert_action(
        &mut self,
        user_id: UserId,
        post_id: PostId,
        at: DateTime<Utc>,
    ) -> RepoResult<ActionRecord> {
        if self
            .working
            .active()
            .any(|r| r.user_id == user_id && r.post_id == post_id)
        {
            return Err(DomainError::AlreadyActive);
        }
        self.working.next_action_id += 1;
        let record = ActionRecord::new(ActionId::new(self.working.next_action_id), user_id, post_id, at);
        self.working.actions.push(record.clone());
        Ok(record)
    }

    async fn remove_action(&mut self, id: ActionId, at: DateTime<Utc>) -> RepoResult<bool> {
        match self.working.actions.iter_mut().find(|r| r.id == id) {
            Some(record) if record.is_active() => {
                record.remove(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn try_increment_daily(
        &mut self,
        user_id: UserId,
        day: NaiveDate,
        limit: i32,
    ) -> RepoResult<Option<i32>> {
        Ok(self.working.try_increment(user_id, day, limit))
    }

    async fn decrement_daily(&mut self, user_id: UserId, day: NaiveDate) -> RepoResult<Option<i32>> {
        Ok(self.working.decrement(user_id, day))
    }

    async fn adjust_stat(&mut self, user_id: UserId, kind: StatKind, delta: i32) -> RepoResult<()> {
        self.working
            .stats
            .entry(user_id)
            .or_insert_with(|| UserStats::new(user_id))
            .apply(kind, delta);
        Ok(())
    }

    async fn refresh_post_count(&mut self, post_id: PostId) -> RepoResult<i32> {
        let count = self.working.active().filter(|r| r.post_id == post_id).count();
        let count = i32::try_from(count).map_err(|e| DomainError::Database(e.to_string()))?;
        let post = self
            .working
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        post.actionable_count = count;
        Ok(count)
    }

    async fn commit(mut self: Box<Self>) -> RepoResult<()> {
        if self.working.fail_commits {
            return Err(DomainError::Database("simulated commit failure".to_string()));
        }
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}

#[async_trait]
impl DailyQuotaRepository for InMemoryStore {
    async fn increment(&self, user_id: UserId, day: NaiveDate) -> RepoResult<i32> {
        let mut state = self.state.lock().await;
        let count = state.daily.entry((user_id, day)).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn try_increment(&self, user_id: UserId, day: NaiveDate, limit: i32) -> RepoResult<Option<i32>> {
        Ok(self.state.lock().await.try_increment(user_id, day, limit))
    }

    async fn decrement(&self, user_id: UserId, day: NaiveDate) -> RepoResult<Option<i32>> {
        Ok(self.state.lock().await.decrement(user_id, day))
    }

    async fn count(&self, user_id: UserId, day: NaiveDate) -> RepoResult<i32> {
        Ok(self.quota(user_id, day).await)
    }

    async fn purge_before(&self, cutoff: NaiveDate) -> RepoResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.daily.len();
        state.daily.retain(|(_, day), _| *day >= cutoff);
        Ok((before - state.daily.len()) as u64)
    }
}

#[async_trait]
impl UserStatsRepository for InMemoryStore {
    async fn find(&self, user_id: UserId) -> RepoResult<UserStats> {
        Ok(self.stats(user_id).await)
    }

    async fn reconcile(&self, user_id: UserId) -> RepoResult<UserStats> {
        let mut state = self.state.lock().await;
        let given = state.active().filter(|r| r.user_id == user_id).count();
        let received = state
            .active()
            .filter(|r| state.owner_of(r.post_id) == Some(user_id))
            .count();
        let stats = UserStats {
            user_id,
            actionable_given: i32::try_from(given).map_err(|e| DomainError::Database(e.to_string()))?,
            actionable_received: i32::try_from(received)
                .map_err(|e| DomainError::Database(e.to_string()))?,
        };
        state.stats.insert(user_id, stats);
        Ok(stats)
    }
}

#[async_trait]
impl HealthProbe for InMemoryStore {
    async fn ping(&self) -> RepoResult<()> {
        if self.state.lock().await.unhealthy {
            return Err(DomainError::Database("store unreachable".to_string()));
        }
        Ok(())
    }
}

/// Publisher that records events instead of sending them
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
    failing: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()> {
        if self.failing {
            return Err(DomainError::Cache("publisher unavailable".to_string()));
        }
        self.events.lock().await.push(event.clone());
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        if self.failing {
            return Err(DomainError::Cache("publisher unavailable".to_string()));
        }
        Ok(())
    }
}

/// Summary cache backed by a map
#[derive(Debug, Default)]
pub struct InMemorySummaryCache {
    entries: Mutex<HashMap<UserId, UserSummary>>,
    failing: bool,
}

impl InMemorySummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub async fn cached(&self, user_id: UserId) -> Option<UserSummary> {
        self.entries.lock().await.get(&user_id).cloned()
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing {
            return Err(DomainError::Cache("cache unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SummaryCache for InMemorySummaryCache {
    async fn get(&self, user_id: UserId) -> RepoResult<Option<UserSummary>> {
        self.check()?;
        Ok(self.cached(user_id).await)
    }

    async fn put(&self, summary: &UserSummary) -> RepoResult<()> {
        self.check()?;
        self.entries
            .lock()
            .await
            .insert(summary.user_id, summary.clone());
        Ok(())
    }

    async fn invalidate(&self, user_ids: &[UserId]) -> RepoResult<()> {
        self.check()?;
        let mut entries = self.entries.lock().await;
        for id in user_ids {
            entries.remove(id);
        }
        Ok(())
    }
}

/// A service context wired to in-memory ports, with handles to inspect them
pub struct TestHarness {
    pub store: InMemoryStore,
    pub publisher: Arc<RecordingPublisher>,
    pub cache: Arc<InMemorySummaryCache>,
    pub ctx: ServiceContext,
}

impl TestHarness {
    pub fn new(settings: ActionableSettings) -> Self {
        Self::with_parts(
            settings,
            Arc::new(RecordingPublisher::new()),
            Arc::new(InMemorySummaryCache::new()),
        )
    }

    pub fn with_parts(
        settings: ActionableSettings,
        publisher: Arc<RecordingPublisher>,
        cache: Arc<InMemorySummaryCache>,
    ) -> Self {
        let store = InMemoryStore::new();
        let ctx = ServiceContext::builder()
            .user_repo(Arc::new(store.clone()))
            .post_repo(Arc::new(store.clone()))
            .action_repo(Arc::new(store.clone()))
            .quota_repo(Arc::new(store.clone()))
            .stats_repo(Arc::new(store.clone()))
            .health_probe(Arc::new(store.clone()))
            .publisher(publisher.clone())
            .summary_cache(cache.clone())
            .settings(settings)
            .jwt_service(Arc::new(JwtService::new(TEST_JWT_SECRET, 900)))
            .build()
            .expect("all ports are set");
        Self {
            store,
            publisher,
            cache,
            ctx,
        }
    }
}
