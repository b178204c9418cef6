//! # actionable-core
//!
//! Domain layer for the "mark post as actionable" feature: entities, value objects,
//! repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ActionRecord, ActionStatus, ActivityItem, ActorSummary, DailyQuota, Post, StatKind, User,
    UserCount, UserStats, UserSummary, ACTIONABLE_ACTION_TYPE_ID,
};
pub use error::DomainError;
pub use events::{ActionableChangedEvent, DomainEvent};
pub use traits::{
    ActionRepository, ActionUnitOfWork, ActivityKind, ActivityQuery, DailyQuotaRepository,
    DirectoryPeriod, DirectoryQuery, EventPublisher, HealthProbe, PostRepository, RepoResult,
    SummaryCache, UserRepository, UserStatsRepository,
};
pub use value_objects::{ActionId, IdParseError, PostId, TopicId, TrustLevel, UserId};
