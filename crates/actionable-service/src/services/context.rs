//! Service context - dependency container for services
//!
//! Holds every port the services need. The concrete Postgres and Redis
//! implementations are wired in by the API crate; tests wire in-memory ones.

use std::sync::Arc;

use actionable_common::{ActionableSettings, JwtService};
use actionable_core::traits::{
    ActionRepository, DailyQuotaRepository, EventPublisher, HealthProbe, PostRepository,
    SummaryCache, UserRepository, UserStatsRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::guardian::{DefaultGuardian, PolicyGuardian};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Host lookups (users, posts)
/// - Action records, daily quota and aggregate stats
/// - The event publisher and summary cache
/// - Site settings and the policy guardian
#[derive(Clone)]
pub struct ServiceContext {
    // Host lookups
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,

    // Feature storage
    action_repo: Arc<dyn ActionRepository>,
    quota_repo: Arc<dyn DailyQuotaRepository>,
    stats_repo: Arc<dyn UserStatsRepository>,

    // Side channels
    publisher: Arc<dyn EventPublisher>,
    summary_cache: Arc<dyn SummaryCache>,
    health_probe: Arc<dyn HealthProbe>,

    // Policy
    guardian: Arc<dyn PolicyGuardian>,
    settings: ActionableSettings,

    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Host Lookups ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    // === Feature Storage ===

    pub fn action_repo(&self) -> &dyn ActionRepository {
        self.action_repo.as_ref()
    }

    pub fn quota_repo(&self) -> &dyn DailyQuotaRepository {
        self.quota_repo.as_ref()
    }

    pub fn stats_repo(&self) -> &dyn UserStatsRepository {
        self.stats_repo.as_ref()
    }

    // === Side Channels ===

    /// Get the event publisher
    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    /// Get the user summary cache
    pub fn summary_cache(&self) -> &dyn SummaryCache {
        self.summary_cache.as_ref()
    }

    /// Get the primary store's health probe
    pub fn health_probe(&self) -> &dyn HealthProbe {
        self.health_probe.as_ref()
    }

    // === Policy ===

    pub fn guardian(&self) -> &dyn PolicyGuardian {
        self.guardian.as_ref()
    }

    /// Current site settings
    pub fn settings(&self) -> &ActionableSettings {
        &self.settings
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for ServiceContext
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    action_repo: Option<Arc<dyn ActionRepository>>,
    quota_repo: Option<Arc<dyn DailyQuotaRepository>>,
    stats_repo: Option<Arc<dyn UserStatsRepository>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    summary_cache: Option<Arc<dyn SummaryCache>>,
    health_probe: Option<Arc<dyn HealthProbe>>,
    guardian: Option<Arc<dyn PolicyGuardian>>,
    settings: Option<ActionableSettings>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            post_repo: None,
            action_repo: None,
            quota_repo: None,
            stats_repo: None,
            publisher: None,
            summary_cache: None,
            health_probe: None,
            guardian: None,
            settings: None,
            jwt_service: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn action_repo(mut self, repo: Arc<dyn ActionRepository>) -> Self {
        self.action_repo = Some(repo);
        self
    }

    pub fn quota_repo(mut self, repo: Arc<dyn DailyQuotaRepository>) -> Self {
        self.quota_repo = Some(repo);
        self
    }

    pub fn stats_repo(mut self, repo: Arc<dyn UserStatsRepository>) -> Self {
        self.stats_repo = Some(repo);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn summary_cache(mut self, cache: Arc<dyn SummaryCache>) -> Self {
        self.summary_cache = Some(cache);
        self
    }

    pub fn health_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.health_probe = Some(probe);
        self
    }

    /// Override the default policy
    pub fn guardian(mut self, guardian: Arc<dyn PolicyGuardian>) -> Self {
        self.guardian = Some(guardian);
        self
    }

    pub fn settings(mut self, settings: ActionableSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// Returns an error if any required port is missing. The guardian and
    /// settings fall back to their defaults.
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            action_repo: self
                .action_repo
                .ok_or_else(|| ServiceError::validation("action_repo is required"))?,
            quota_repo: self
                .quota_repo
                .ok_or_else(|| ServiceError::validation("quota_repo is required"))?,
            stats_repo: self
                .stats_repo
                .ok_or_else(|| ServiceError::validation("stats_repo is required"))?,
            publisher: self
                .publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
            summary_cache: self
                .summary_cache
                .ok_or_else(|| ServiceError::validation("summary_cache is required"))?,
            health_probe: self
                .health_probe
                .ok_or_else(|| ServiceError::validation("health_probe is required"))?,
            guardian: self.guardian.unwrap_or_else(|| Arc::new(DefaultGuardian)),
            settings: self.settings.unwrap_or_default(),
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
