//! Actionable toggle service
//!
//! Create and destroy run every precondition first, then apply all writes in
//! one unit of work. Neither publishes anything: each returns the domain
//! event in its outcome and the caller dispatches it after commit.

use actionable_core::{
    ActionId, ActionRecord, ActionableChangedEvent, ActivityKind, ActivityQuery, DirectoryPeriod,
    DirectoryQuery, DomainError, DomainEvent, Post, PostId, StatKind, User, UserId, UserSummary,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::quota::DailyQuotaService;
use crate::dto::{
    ActionableStateResponse, ActivityItemResponse, ActorResponse, DirectoryResponse,
    PaginatedResponse, ToggleResponse, UserCountResponse, UserStatsResponse, UserSummaryResponse,
    MAX_LIMIT,
};

/// Entries in each summary ranking
pub const SUMMARY_TOP_USERS: i64 = 6;

/// Result of a successful create or destroy
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    /// The record as it stands after the toggle
    pub record: ActionRecord,
    /// Owner of the marked post
    pub post_owner: UserId,
    pub actionable_count: i32,
    pub acted: bool,
    pub can_undo_actionable: bool,
    /// Event to dispatch now that the change is committed
    pub event: DomainEvent,
}

impl ToggleOutcome {
    /// Users whose summaries the toggle changed
    pub fn affected_users(&self) -> [UserId; 2] {
        [self.record.user_id, self.post_owner]
    }

    pub fn response(&self) -> ToggleResponse {
        ToggleResponse {
            success: true,
            acted: self.acted,
            actionable_count: self.actionable_count,
            can_undo_actionable: self.can_undo_actionable,
        }
    }
}

/// Actionable service
pub struct ActionableService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActionableService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // =========================================================================
    // Toggle
    // =========================================================================

    /// Mark a post actionable on behalf of `actor`
    #[instrument(skip(self))]
    pub async fn create(&self, actor: Option<UserId>, post_id: PostId) -> ServiceResult<ToggleOutcome> {
        let settings = self.ctx.settings();
        if !settings.enabled {
            return Err(DomainError::FeatureDisabled.into());
        }

        let actor = self.require_actor(actor).await?;
        if !self.ctx.guardian().is_eligible(&actor, settings) {
            return Err(DomainError::NotEligible.into());
        }

        let post = self.require_post(post_id).await?;
        if post.is_owned_by(actor.id) {
            return Err(DomainError::SelfAction.into());
        }
        if post.is_unavailable() {
            return Err(DomainError::ResourceUnavailable.into());
        }

        if self
            .ctx
            .action_repo()
            .find_active(actor.id, post.id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyActive.into());
        }

        // Cheap precheck; the conditional increment below is authoritative
        if !DailyQuotaService::new(self.ctx)
            .within_limit(actor.id, settings.max_per_day)
            .await?
        {
            return Err(DomainError::QuotaExceeded.into());
        }

        let now = Utc::now();
        let mut uow = self.ctx.action_repo().begin().await?;

        let record = uow.insert_action(actor.id, post.id, now).await?;
        if uow
            .try_increment_daily(actor.id, now.date_naive(), settings.max_per_day)
            .await?
            .is_none()
        {
            return Err(DomainError::QuotaExceeded.into());
        }
        uow.adjust_stat(actor.id, StatKind::Given, 1).await?;
        uow.adjust_stat(post.user_id, StatKind::Received, 1).await?;
        let count = uow.refresh_post_count(post.id).await?;
        uow.commit().await?;

        info!(
            post_id = %post.id,
            user_id = %actor.id,
            staff = actor.is_staff(),
            actionable_count = count,
            "Post marked actionable"
        );

        self.invalidate_summaries(&[actor.id, post.user_id]).await;

        Ok(ToggleOutcome {
            event: DomainEvent::ActionableCreated(ActionableChangedEvent {
                post_id: post.id,
                topic_id: post.topic_id,
                actionable_count: count,
                actioned_by: actor.id,
                performed_by: actor.id,
                timestamp: now,
            }),
            record,
            post_owner: post.user_id,
            actionable_count: count,
            acted: true,
            can_undo_actionable: settings.enabled,
        })
    }

    /// Remove a mark
    ///
    /// `author` names whose record to remove; it defaults to the actor and
    /// only staff may name someone else.
    #[instrument(skip(self))]
    pub async fn destroy(
        &self,
        actor: Option<UserId>,
        post_id: PostId,
        author: Option<UserId>,
    ) -> ServiceResult<ToggleOutcome> {
        let actor = self.require_actor(actor).await?;
        let post = self.require_post(post_id).await?;

        let author_id = author.unwrap_or(actor.id);
        if author_id != actor.id && !actor.is_staff() {
            return Err(DomainError::NotAuthorized.into());
        }

        let record = match self.ctx.action_repo().find_latest(author_id, post.id).await? {
            None => return Err(DomainError::NotFound.into()),
            Some(r) if !r.is_active() => return Err(DomainError::AlreadyRemoved.into()),
            Some(r) => r,
        };
        if !self.ctx.guardian().can_remove_action(&actor, &record) {
            return Err(DomainError::NotAuthorized.into());
        }

        let now = Utc::now();
        let mut uow = self.ctx.action_repo().begin().await?;

        if !uow.remove_action(record.id, now).await? {
            return Err(DomainError::AlreadyRemoved.into());
        }
        uow.decrement_daily(author_id, record.created_on()).await?;
        uow.adjust_stat(author_id, StatKind::Given, -1).await?;
        uow.adjust_stat(post.user_id, StatKind::Received, -1).await?;
        let count = uow.refresh_post_count(post.id).await?;
        uow.commit().await?;

        if author_id == actor.id {
            info!(
                post_id = %post.id,
                user_id = %actor.id,
                actionable_count = count,
                "Actionable mark removed"
            );
        } else {
            info!(
                post_id = %post.id,
                user_id = %author_id,
                staff_id = %actor.id,
                actionable_count = count,
                "Staff removed another user's actionable mark"
            );
        }

        self.invalidate_summaries(&[author_id, post.user_id]).await;

        let mut removed = record;
        removed.remove(now);

        Ok(ToggleOutcome {
            event: DomainEvent::ActionableDestroyed(ActionableChangedEvent {
                post_id: post.id,
                topic_id: post.topic_id,
                actionable_count: count,
                actioned_by: author_id,
                performed_by: actor.id,
                timestamp: now,
            }),
            record: removed,
            post_owner: post.user_id,
            actionable_count: count,
            acted: false,
            can_undo_actionable: false,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Per-post state as seen by `viewer`
    #[instrument(skip(self))]
    pub async fn status(
        &self,
        viewer: Option<UserId>,
        post_id: PostId,
    ) -> ServiceResult<ActionableStateResponse> {
        let settings = self.ctx.settings();
        let post = self.require_post(post_id).await?;
        let viewer = self.find_viewer(viewer).await?;

        let (actioned, can_toggle) = match &viewer {
            None => (false, false),
            Some(user) => match self.ctx.action_repo().find_active(user.id, post.id).await? {
                Some(record) => (true, self.ctx.guardian().can_remove_action(user, &record)),
                None => (false, settings.enabled && self.can_create_ignoring_quota(user, &post)),
            },
        };

        Ok(ActionableStateResponse {
            actionable_count: post.actionable_count,
            actioned,
            can_undo_actionable: actioned && settings.enabled,
            can_toggle_actionable: can_toggle,
            show_actionable: settings.enabled,
        })
    }

    /// Authors of active marks on a post, oldest first
    #[instrument(skip(self))]
    pub async fn who_actioned(
        &self,
        viewer: Option<UserId>,
        post_id: PostId,
        limit: i64,
    ) -> ServiceResult<Vec<ActorResponse>> {
        validate_limit(limit)?;

        let viewer = self.find_viewer(viewer).await?;
        if !self
            .ctx
            .guardian()
            .can_see_who_actioned(viewer.as_ref(), self.ctx.settings())
        {
            return Err(ServiceError::permission_denied("view who actioned"));
        }

        let post = self.require_post(post_id).await?;
        let actors = self.ctx.action_repo().find_actors(post.id, limit).await?;
        Ok(actors.into_iter().map(ActorResponse::from).collect())
    }

    /// Profile summary, served from the cache when possible
    #[instrument(skip(self))]
    pub async fn user_summary(&self, user_id: UserId) -> ServiceResult<UserSummaryResponse> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        match self.ctx.summary_cache().get(user_id).await {
            Ok(Some(cached)) => return Ok(UserSummaryResponse::from(&cached)),
            Ok(None) => {}
            Err(e) => warn!(%user_id, error = %e, "Summary cache read failed"),
        }

        let stats = self.ctx.stats_repo().find(user_id).await?;
        let actions = self.ctx.action_repo();
        let summary = UserSummary {
            user_id,
            actionable_given: stats.actionable_given,
            actionable_received: stats.actionable_received,
            most_actionabled_by_users: actions.top_actors_for(user_id, SUMMARY_TOP_USERS).await?,
            most_actionabled_users: actions.top_recipients_of(user_id, SUMMARY_TOP_USERS).await?,
        };

        if let Err(e) = self.ctx.summary_cache().put(&summary).await {
            warn!(%user_id, error = %e, "Summary cache write failed");
        }

        Ok(UserSummaryResponse::from(&summary))
    }

    /// Given or received feed, newest first
    #[instrument(skip(self))]
    pub async fn activity(
        &self,
        user_id: UserId,
        kind: ActivityKind,
        limit: i64,
        before: Option<ActionId>,
    ) -> ServiceResult<PaginatedResponse<ActivityItemResponse>> {
        validate_limit(limit)?;

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        // One extra row tells us whether another page exists
        let query = ActivityQuery {
            user_id,
            kind,
            limit: limit + 1,
            before,
        };
        let mut items = self.ctx.action_repo().activity(&query).await?;

        let has_more = items.len() as i64 > limit;
        items.truncate(usize::try_from(limit).unwrap_or(0));
        let cursor = if has_more {
            items.last().map(|item| item.action_id)
        } else {
            None
        };

        Ok(PaginatedResponse::new(
            items.into_iter().map(ActivityItemResponse::from).collect(),
            cursor,
            has_more,
            limit,
        ))
    }

    /// Users ranked by marks given or received within a rolling period
    #[instrument(skip(self))]
    pub async fn directory(
        &self,
        period: DirectoryPeriod,
        kind: ActivityKind,
        limit: i64,
    ) -> ServiceResult<DirectoryResponse> {
        if !self.ctx.settings().enabled {
            return Err(DomainError::FeatureDisabled.into());
        }
        validate_limit(limit)?;

        let query = DirectoryQuery {
            kind,
            since: period.since(Utc::now()),
            limit,
        };
        let ranking = self.ctx.action_repo().directory(&query).await?;

        Ok(DirectoryResponse {
            period,
            kind,
            users: ranking.iter().map(UserCountResponse::from).collect(),
        })
    }

    /// Recompute a user's aggregates from the active records
    #[instrument(skip(self))]
    pub async fn reconcile_stats(
        &self,
        actor: Option<UserId>,
        user_id: UserId,
    ) -> ServiceResult<UserStatsResponse> {
        let actor = self.require_actor(actor).await?;
        if !self.ctx.guardian().can_reconcile(&actor) {
            return Err(ServiceError::permission_denied("reconcile stats"));
        }

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        let stats = self.ctx.stats_repo().reconcile(user_id).await?;
        info!(
            %user_id,
            staff_id = %actor.id,
            given = stats.actionable_given,
            received = stats.actionable_received,
            "Reconciled user stats"
        );

        self.invalidate_summaries(&[user_id]).await;
        Ok(UserStatsResponse::from(stats))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn require_actor(&self, actor: Option<UserId>) -> ServiceResult<User> {
        let Some(id) = actor else {
            return Err(DomainError::NotAuthenticated.into());
        };
        self.ctx
            .user_repo()
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::Rejected(DomainError::NotAuthenticated))
    }

    async fn find_viewer(&self, viewer: Option<UserId>) -> ServiceResult<Option<User>> {
        match viewer {
            Some(id) => Ok(self.ctx.user_repo().find_by_id(id).await?),
            None => Ok(None),
        }
    }

    async fn require_post(&self, post_id: PostId) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))
    }

    fn can_create_ignoring_quota(&self, user: &User, post: &Post) -> bool {
        self.ctx.guardian().is_eligible(user, self.ctx.settings())
            && !post.is_owned_by(user.id)
            && !post.is_unavailable()
    }

    async fn invalidate_summaries(&self, user_ids: &[UserId]) {
        if let Err(e) = self.ctx.summary_cache().invalidate(user_ids).await {
            warn!(?user_ids, error = %e, "Summary cache invalidation failed");
        }
    }
}

fn validate_limit(limit: i64) -> ServiceResult<()> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ServiceError::validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemorySummaryCache, RecordingPublisher, TestHarness};
    use actionable_common::ActionableSettings;
    use actionable_core::{ActionRepository, TopicId, TrustLevel};
    use chrono::Days;
    use std::sync::Arc;

    use crate::services::quota::today;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);
    const STAFF: UserId = UserId::new(3);
    const CAROL: UserId = UserId::new(4);
    const POST: PostId = PostId::new(100);

    async fn harness_with(settings: ActionableSettings) -> TestHarness {
        let h = TestHarness::new(settings);
        let level = TrustLevel::new(1).unwrap();
        h.store.add_user(User::new(ALICE, "alice", level)).await;
        h.store.add_user(User::new(BOB, "bob", level)).await;
        h.store.add_user(User::new(STAFF, "staff", level).with_staff()).await;
        h.store.add_user(User::new(CAROL, "carol", level)).await;
        h.store.add_post(Post::new(POST, TopicId::new(10), BOB)).await;
        h
    }

    async fn harness() -> TestHarness {
        harness_with(ActionableSettings::default()).await
    }

    async fn add_posts(h: &TestHarness, owner: UserId, ids: std::ops::Range<i64>) -> Vec<PostId> {
        let mut posts = Vec::new();
        for id in ids {
            h.store.add_post(Post::new(PostId::new(id), TopicId::new(10), owner)).await;
            posts.push(PostId::new(id));
        }
        posts
    }

    fn rejection<T: std::fmt::Debug>(result: ServiceResult<T>) -> DomainError {
        match result {
            Err(ServiceError::Rejected(e)) => e,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    async fn count(h: &TestHarness, post: PostId) -> i32 {
        h.store.post(post).await.unwrap().actionable_count
    }

    // =========================================================================
    // Create
    // =========================================================================

    #[tokio::test]
    async fn test_create_marks_post_and_updates_aggregates() {
        let h = harness().await;
        let outcome = ActionableService::new(&h.ctx).create(Some(ALICE), POST).await.unwrap();

        assert_eq!(
            outcome.response(),
            ToggleResponse {
                success: true,
                acted: true,
                actionable_count: 1,
                can_undo_actionable: true,
            }
        );
        assert_eq!(count(&h, POST).await, 1);
        assert_eq!(h.store.stats(ALICE).await.actionable_given, 1);
        assert_eq!(h.store.stats(BOB).await.actionable_received, 1);
        assert_eq!(h.store.quota(ALICE, today()).await, 1);

        let DomainEvent::ActionableCreated(payload) = &outcome.event else {
            panic!("expected a created event");
        };
        assert_eq!(payload.post_id, POST);
        assert_eq!(payload.actioned_by, ALICE);
        assert_eq!(payload.actionable_count, 1);
        assert_eq!(outcome.affected_users(), [ALICE, BOB]);
    }

    /// Log sink shared with a test subscriber
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_create_log_records_staff_flag() {
        let h = harness().await;
        h.store.add_post(Post::new(PostId::new(101), TopicId::new(10), BOB)).await;
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let service = ActionableService::new(&h.ctx);
        service.create(Some(ALICE), POST).await.unwrap();
        service.create(Some(STAFF), PostId::new(101)).await.unwrap();

        let output = logs.contents();
        let lines: Vec<_> = output
            .lines()
            .filter(|line| line.contains("Post marked actionable"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("staff=false"));
        assert!(lines[1].contains("staff=true"));
    }

    #[tokio::test]
    async fn test_create_twice_is_already_active() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        service.create(Some(ALICE), POST).await.unwrap();
        let err = rejection(service.create(Some(ALICE), POST).await);

        assert_eq!(err, DomainError::AlreadyActive);
        assert_eq!(count(&h, POST).await, 1);
        assert_eq!(h.store.quota(ALICE, today()).await, 1);
        assert_eq!(h.store.stats(ALICE).await.actionable_given, 1);
    }

    #[tokio::test]
    async fn test_create_allows_exactly_the_daily_limit() {
        let h = harness_with(ActionableSettings {
            max_per_day: 3,
            ..ActionableSettings::default()
        })
        .await;
        let posts = add_posts(&h, BOB, 200..204).await;
        let service = ActionableService::new(&h.ctx);

        for post in &posts[..3] {
            service.create(Some(ALICE), *post).await.unwrap();
        }
        let err = rejection(service.create(Some(ALICE), posts[3]).await);

        assert_eq!(err, DomainError::QuotaExceeded);
        assert_eq!(count(&h, posts[3]).await, 0);
        assert_eq!(h.store.quota(ALICE, today()).await, 3);
    }

    #[tokio::test]
    async fn test_zero_limit_blocks_everyone() {
        let h = harness_with(ActionableSettings {
            max_per_day: 0,
            ..ActionableSettings::default()
        })
        .await;
        let err = rejection(ActionableService::new(&h.ctx).create(Some(ALICE), POST).await);
        assert_eq!(err, DomainError::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_self_action_is_rejected() {
        let h = harness().await;
        let err = rejection(ActionableService::new(&h.ctx).create(Some(BOB), POST).await);

        assert_eq!(err, DomainError::SelfAction);
        assert_eq!(count(&h, POST).await, 0);
        assert!(h.store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_feature_disabled() {
        let h = harness_with(ActionableSettings {
            enabled: false,
            ..ActionableSettings::default()
        })
        .await;
        let err = rejection(ActionableService::new(&h.ctx).create(Some(ALICE), POST).await);
        assert_eq!(err, DomainError::FeatureDisabled);
    }

    #[tokio::test]
    async fn test_anonymous_actor_is_not_authenticated() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        let err = service.create(None, POST).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.reason(), "not authenticated");

        let err = rejection(service.create(Some(UserId::new(999)), POST).await);
        assert_eq!(err, DomainError::NotAuthenticated);

        let err = rejection(service.destroy(None, POST, None).await);
        assert_eq!(err, DomainError::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_low_trust_is_not_eligible() {
        let h = harness_with(ActionableSettings {
            min_trust_level: TrustLevel::new(3).unwrap(),
            ..ActionableSettings::default()
        })
        .await;
        let err = rejection(ActionableService::new(&h.ctx).create(Some(ALICE), POST).await);
        assert_eq!(err, DomainError::NotEligible);
    }

    #[tokio::test]
    async fn test_unavailable_posts_are_rejected() {
        let h = harness().await;
        let topic = TopicId::new(10);

        let mut deleted = Post::new(PostId::new(301), topic, BOB);
        deleted.deleted = true;
        let mut archived = Post::new(PostId::new(302), topic, BOB);
        archived.topic_archived = true;
        let mut closed = Post::new(PostId::new(303), topic, BOB);
        closed.topic_closed = true;

        for post in [deleted, archived, closed] {
            let id = post.id;
            h.store.add_post(post).await;
            let err = rejection(ActionableService::new(&h.ctx).create(Some(ALICE), id).await);
            assert_eq!(err, DomainError::ResourceUnavailable);
        }
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let h = harness().await;
        let err = ActionableService::new(&h.ctx)
            .create(Some(ALICE), PostId::new(404))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_failed_commit_applies_nothing() {
        let h = harness().await;
        h.store.fail_commits(true).await;

        let err = ActionableService::new(&h.ctx)
            .create(Some(ALICE), POST)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Persistence(_)));
        assert_eq!(err.reason(), "persistence error");
        assert_eq!(count(&h, POST).await, 0);
        assert_eq!(h.store.quota(ALICE, today()).await, 0);
        assert_eq!(h.store.stats(ALICE).await.actionable_given, 0);
        assert_eq!(h.store.stats(BOB).await.actionable_received, 0);
        assert!(h.store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_service_never_publishes() {
        let h = harness().await;
        ActionableService::new(&h.ctx).create(Some(ALICE), POST).await.unwrap();
        assert!(h.publisher.events().await.is_empty());
    }

    // =========================================================================
    // Destroy
    // =========================================================================

    #[tokio::test]
    async fn test_destroy_restores_previous_state() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        service.create(Some(ALICE), POST).await.unwrap();
        let outcome = service.destroy(Some(ALICE), POST, None).await.unwrap();

        assert_eq!(
            outcome.response(),
            ToggleResponse {
                success: true,
                acted: false,
                actionable_count: 0,
                can_undo_actionable: false,
            }
        );
        assert!(!outcome.record.is_active());
        assert_eq!(count(&h, POST).await, 0);
        assert_eq!(h.store.quota(ALICE, today()).await, 0);
        assert_eq!(h.store.stats(ALICE).await.actionable_given, 0);
        assert_eq!(h.store.stats(BOB).await.actionable_received, 0);
        assert!(matches!(outcome.event, DomainEvent::ActionableDestroyed(_)));
    }

    #[tokio::test]
    async fn test_destroy_without_record_is_not_found() {
        let h = harness().await;
        let err = rejection(ActionableService::new(&h.ctx).destroy(Some(ALICE), POST, None).await);
        assert_eq!(err, DomainError::NotFound);
    }

    #[tokio::test]
    async fn test_destroy_twice_is_already_removed() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        service.create(Some(ALICE), POST).await.unwrap();
        service.destroy(Some(ALICE), POST, None).await.unwrap();
        let err = rejection(service.destroy(Some(ALICE), POST, None).await);

        assert_eq!(err, DomainError::AlreadyRemoved);
        assert_eq!(h.store.quota(ALICE, today()).await, 0);
    }

    #[tokio::test]
    async fn test_non_staff_cannot_remove_another_users_mark() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        service.create(Some(ALICE), POST).await.unwrap();

        let err = rejection(service.destroy(Some(CAROL), POST, Some(ALICE)).await);
        assert_eq!(err, DomainError::NotAuthorized);

        // Same answer when the named user has no mark at all
        let err = rejection(service.destroy(Some(CAROL), POST, Some(BOB)).await);
        assert_eq!(err, DomainError::NotAuthorized);

        assert_eq!(count(&h, POST).await, 1);
    }

    #[tokio::test]
    async fn test_staff_removal_is_attributed_to_author() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        service.create(Some(ALICE), POST).await.unwrap();

        let outcome = service.destroy(Some(STAFF), POST, Some(ALICE)).await.unwrap();

        let payload = outcome.event.payload();
        assert_eq!(payload.actioned_by, ALICE);
        assert_eq!(payload.performed_by, STAFF);
        assert_eq!(payload.actionable_count, 0);
        assert_eq!(h.store.quota(ALICE, today()).await, 0);
        assert_eq!(h.store.stats(ALICE).await.actionable_given, 0);
        assert_eq!(outcome.affected_users(), [ALICE, BOB]);
    }

    #[tokio::test]
    async fn test_recreate_after_destroy_inserts_new_record() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        let first = service.create(Some(ALICE), POST).await.unwrap();
        service.destroy(Some(ALICE), POST, None).await.unwrap();
        let second = service.create(Some(ALICE), POST).await.unwrap();

        assert_ne!(first.record.id, second.record.id);
        let records = h.store.records().await;
        assert_eq!(records.len(), 2);
        assert!(!records[0].is_active());
        assert!(records[1].is_active());
        assert_eq!(count(&h, POST).await, 1);
    }

    #[tokio::test]
    async fn test_destroy_decrements_quota_of_creation_day() {
        let h = harness().await;
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        let created_at = Utc::now() - chrono::Duration::days(1);

        let mut uow = h.store.begin().await.unwrap();
        uow.insert_action(ALICE, POST, created_at).await.unwrap();
        uow.try_increment_daily(ALICE, yesterday, 50).await.unwrap();
        uow.refresh_post_count(POST).await.unwrap();
        uow.commit().await.unwrap();
        h.store.set_quota(ALICE, today(), 2).await;

        ActionableService::new(&h.ctx)
            .destroy(Some(ALICE), POST, None)
            .await
            .unwrap();

        assert_eq!(h.store.quota(ALICE, yesterday).await, 0);
        assert_eq!(h.store.quota(ALICE, today()).await, 2);
    }

    #[tokio::test]
    async fn test_destroy_with_drifted_stats_stays_non_negative() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        service.create(Some(ALICE), POST).await.unwrap();
        h.store.set_stats(actionable_core::UserStats::new(ALICE)).await;
        h.store.set_quota(ALICE, today(), 0).await;

        service.destroy(Some(ALICE), POST, None).await.unwrap();

        assert_eq!(h.store.stats(ALICE).await.actionable_given, 0);
        assert_eq!(h.store.quota(ALICE, today()).await, 0);
    }

    // =========================================================================
    // Concurrency
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_never_exceed_limit() {
        let h = Arc::new(
            harness_with(ActionableSettings {
                max_per_day: 5,
                ..ActionableSettings::default()
            })
            .await,
        );
        let posts = add_posts(&h, BOB, 500..520).await;

        let tasks: Vec<_> = posts
            .into_iter()
            .map(|post| {
                let h = Arc::clone(&h);
                tokio::spawn(async move { ActionableService::new(&h.ctx).create(Some(ALICE), post).await })
            })
            .collect();

        let mut succeeded = 0;
        for result in futures::future::join_all(tasks).await {
            match result.unwrap() {
                Ok(_) => succeeded += 1,
                Err(e) => assert_eq!(e.rejection(), Some(&DomainError::QuotaExceeded)),
            }
        }

        assert_eq!(succeeded, 5);
        assert_eq!(h.store.quota(ALICE, today()).await, 5);
        assert_eq!(h.store.stats(ALICE).await.actionable_given, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_on_same_pair_have_one_winner() {
        let h = Arc::new(harness().await);

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let h = Arc::clone(&h);
                tokio::spawn(async move { ActionableService::new(&h.ctx).create(Some(ALICE), POST).await })
            })
            .collect();

        let mut succeeded = 0;
        for result in futures::future::join_all(tasks).await {
            match result.unwrap() {
                Ok(_) => succeeded += 1,
                Err(e) => assert_eq!(e.rejection(), Some(&DomainError::AlreadyActive)),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(count(&h, POST).await, 1);
        assert_eq!(h.store.quota(ALICE, today()).await, 1);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[tokio::test]
    async fn test_status_for_anonymous_viewer() {
        let h = harness().await;
        let state = ActionableService::new(&h.ctx).status(None, POST).await.unwrap();

        assert_eq!(
            state,
            ActionableStateResponse {
                actionable_count: 0,
                actioned: false,
                can_undo_actionable: false,
                can_toggle_actionable: false,
                show_actionable: true,
            }
        );
    }

    #[tokio::test]
    async fn test_status_tracks_viewer() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        let before = service.status(Some(ALICE), POST).await.unwrap();
        assert!(before.can_toggle_actionable);
        assert!(!before.actioned);

        service.create(Some(ALICE), POST).await.unwrap();
        let after = service.status(Some(ALICE), POST).await.unwrap();
        assert!(after.actioned);
        assert!(after.can_undo_actionable);
        assert!(after.can_toggle_actionable);
        assert_eq!(after.actionable_count, 1);

        let owner = service.status(Some(BOB), POST).await.unwrap();
        assert!(!owner.can_toggle_actionable);
    }

    #[tokio::test]
    async fn test_status_when_disabled() {
        let h = harness_with(ActionableSettings {
            enabled: false,
            ..ActionableSettings::default()
        })
        .await;
        let state = ActionableService::new(&h.ctx).status(Some(ALICE), POST).await.unwrap();
        assert!(!state.show_actionable);
        assert!(!state.can_toggle_actionable);
    }

    #[tokio::test]
    async fn test_who_actioned_lists_oldest_first() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        service.create(Some(CAROL), POST).await.unwrap();
        service.create(Some(ALICE), POST).await.unwrap();

        let actors = service.who_actioned(None, POST, 50).await.unwrap();
        let ids: Vec<_> = actors.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![CAROL, ALICE]);
        assert_eq!(actors[0].username, "carol");

        let first = service.who_actioned(None, POST, 1).await.unwrap();
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_who_actioned_hidden_from_non_staff() {
        let h = harness_with(ActionableSettings {
            show_who_actioned: false,
            ..ActionableSettings::default()
        })
        .await;
        let service = ActionableService::new(&h.ctx);

        let err = service.who_actioned(Some(ALICE), POST, 50).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        let err = service.who_actioned(None, POST, 50).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(service.who_actioned(Some(STAFF), POST, 50).await.is_ok());
    }

    #[tokio::test]
    async fn test_who_actioned_validates_input() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        let err = service.who_actioned(None, POST, 0).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        let err = service.who_actioned(None, POST, 101).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        let err = service.who_actioned(None, PostId::new(404), 10).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_user_summary_ranks_and_caches() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        let posts = add_posts(&h, BOB, 600..602).await;

        service.create(Some(ALICE), posts[0]).await.unwrap();
        service.create(Some(ALICE), posts[1]).await.unwrap();
        service.create(Some(CAROL), posts[0]).await.unwrap();

        let summary = service.user_summary(BOB).await.unwrap();
        assert_eq!(summary.actionable_received, 3);
        let ranking: Vec<_> = summary
            .most_actionabled_by_users
            .iter()
            .map(|u| (u.id, u.count))
            .collect();
        assert_eq!(ranking, vec![(ALICE, 2), (CAROL, 1)]);

        let alice = service.user_summary(ALICE).await.unwrap();
        assert_eq!(alice.actionable_given, 2);
        assert_eq!(alice.most_actionabled_users[0].id, BOB);

        assert!(h.cache.cached(BOB).await.is_some());
    }

    #[tokio::test]
    async fn test_toggle_invalidates_cached_summaries() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);

        service.user_summary(ALICE).await.unwrap();
        service.user_summary(BOB).await.unwrap();
        service.create(Some(ALICE), POST).await.unwrap();

        assert!(h.cache.cached(ALICE).await.is_none());
        assert!(h.cache.cached(BOB).await.is_none());
        assert_eq!(service.user_summary(BOB).await.unwrap().actionable_received, 1);
    }

    #[tokio::test]
    async fn test_cache_failures_do_not_fail_requests() {
        let h = TestHarness::with_parts(
            ActionableSettings::default(),
            Arc::new(RecordingPublisher::new()),
            Arc::new(InMemorySummaryCache::failing()),
        );
        let level = TrustLevel::MIN;
        h.store.add_user(User::new(ALICE, "alice", level)).await;
        h.store.add_user(User::new(BOB, "bob", level)).await;
        h.store.add_post(Post::new(POST, TopicId::new(10), BOB)).await;
        let service = ActionableService::new(&h.ctx);

        service.create(Some(ALICE), POST).await.unwrap();
        let summary = service.user_summary(BOB).await.unwrap();
        assert_eq!(summary.actionable_received, 1);
    }

    #[tokio::test]
    async fn test_user_summary_unknown_user() {
        let h = harness().await;
        let err = ActionableService::new(&h.ctx)
            .user_summary(UserId::new(999))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_user_summary_ignores_deleted_posts() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        let posts = add_posts(&h, BOB, 650..652).await;

        service.create(Some(ALICE), posts[0]).await.unwrap();
        service.create(Some(ALICE), posts[1]).await.unwrap();

        let mut deleted = h.store.post(posts[1]).await.unwrap();
        deleted.deleted = true;
        h.store.add_post(deleted).await;

        let summary = service.user_summary(BOB).await.unwrap();
        assert_eq!(summary.most_actionabled_by_users[0].count, 1);
        let alice = service.user_summary(ALICE).await.unwrap();
        assert_eq!(alice.most_actionabled_users[0].count, 1);
    }

    // =========================================================================
    // Directory
    // =========================================================================

    fn ranking(response: &DirectoryResponse) -> Vec<(UserId, i64)> {
        response.users.iter().map(|u| (u.id, u.count)).collect()
    }

    #[tokio::test]
    async fn test_directory_ranks_within_period() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        let posts = add_posts(&h, BOB, 700..703).await;

        for &post in &posts {
            service.create(Some(ALICE), post).await.unwrap();
        }
        let mut uow = h.store.begin().await.unwrap();
        uow.insert_action(CAROL, posts[0], Utc::now() - chrono::Duration::days(10))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let weekly = service
            .directory(DirectoryPeriod::Weekly, ActivityKind::Given, 10)
            .await
            .unwrap();
        assert_eq!(ranking(&weekly), vec![(ALICE, 3)]);
        assert_eq!(weekly.period, DirectoryPeriod::Weekly);

        let all = service
            .directory(DirectoryPeriod::All, ActivityKind::Given, 10)
            .await
            .unwrap();
        assert_eq!(ranking(&all), vec![(ALICE, 3), (CAROL, 1)]);

        let received = service
            .directory(DirectoryPeriod::Monthly, ActivityKind::Received, 10)
            .await
            .unwrap();
        assert_eq!(ranking(&received), vec![(BOB, 4)]);

        let top = service
            .directory(DirectoryPeriod::All, ActivityKind::Given, 1)
            .await
            .unwrap();
        assert_eq!(ranking(&top), vec![(ALICE, 3)]);
    }

    #[tokio::test]
    async fn test_directory_skips_deleted_posts_and_inactive_users() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        let posts = add_posts(&h, BOB, 710..712).await;

        service.create(Some(ALICE), posts[0]).await.unwrap();
        service.create(Some(ALICE), posts[1]).await.unwrap();
        service.create(Some(CAROL), posts[0]).await.unwrap();

        let mut deleted = h.store.post(posts[1]).await.unwrap();
        deleted.deleted = true;
        h.store.add_post(deleted).await;

        let mut carol = User::new(CAROL, "carol", TrustLevel::new(1).unwrap());
        carol.active = false;
        h.store.add_user(carol).await;

        let given = service
            .directory(DirectoryPeriod::All, ActivityKind::Given, 10)
            .await
            .unwrap();
        assert_eq!(ranking(&given), vec![(ALICE, 1)]);
    }

    #[tokio::test]
    async fn test_directory_validates_and_respects_setting() {
        let h = harness().await;
        let err = ActionableService::new(&h.ctx)
            .directory(DirectoryPeriod::Daily, ActivityKind::Given, 0)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        let h = harness_with(ActionableSettings {
            enabled: false,
            ..ActionableSettings::default()
        })
        .await;
        let err = rejection(
            ActionableService::new(&h.ctx)
                .directory(DirectoryPeriod::All, ActivityKind::Given, 10)
                .await,
        );
        assert_eq!(err, DomainError::FeatureDisabled);
    }

    #[tokio::test]
    async fn test_activity_pages_newest_first() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        let posts = add_posts(&h, BOB, 700..703).await;
        for post in &posts {
            service.create(Some(ALICE), *post).await.unwrap();
        }

        let page = service.activity(ALICE, ActivityKind::Given, 2, None).await.unwrap();
        let ids: Vec<_> = page.data.iter().map(|i| i.post_id).collect();
        assert_eq!(ids, vec![posts[2], posts[1]]);
        assert!(page.pagination.has_more);

        let next = service
            .activity(ALICE, ActivityKind::Given, 2, page.pagination.before)
            .await
            .unwrap();
        assert_eq!(next.data.len(), 1);
        assert_eq!(next.data[0].post_id, posts[0]);
        assert!(!next.pagination.has_more);
        assert!(next.pagination.before.is_none());

        let received = service.activity(BOB, ActivityKind::Received, 10, None).await.unwrap();
        assert_eq!(received.data.len(), 3);
        assert!(received.data.iter().all(|i| i.acting_user_id == ALICE));
    }

    #[tokio::test]
    async fn test_activity_skips_removed_marks() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        service.create(Some(ALICE), POST).await.unwrap();
        service.destroy(Some(ALICE), POST, None).await.unwrap();

        let page = service.activity(ALICE, ActivityKind::Given, 10, None).await.unwrap();
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_repairs_drift() {
        let h = harness().await;
        let service = ActionableService::new(&h.ctx);
        service.create(Some(ALICE), POST).await.unwrap();
        h.store
            .set_stats(actionable_core::UserStats {
                user_id: BOB,
                actionable_given: 7,
                actionable_received: 0,
            })
            .await;

        let stats = service.reconcile_stats(Some(STAFF), BOB).await.unwrap();
        assert_eq!(stats.actionable_given, 0);
        assert_eq!(stats.actionable_received, 1);
        assert_eq!(h.store.stats(BOB).await.actionable_given, 0);
    }

    #[tokio::test]
    async fn test_reconcile_requires_staff() {
        let h = harness().await;
        let err = ActionableService::new(&h.ctx)
            .reconcile_stats(Some(ALICE), BOB)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied { .. }));
    }
}
