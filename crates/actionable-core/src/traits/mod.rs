//! Ports - traits implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    ActionRepository, ActionUnitOfWork, ActivityKind, ActivityQuery, DailyQuotaRepository,
    DirectoryPeriod, DirectoryQuery, EventPublisher, HealthProbe, PostRepository, RepoResult,
    SummaryCache, UserRepository, UserStatsRepository,
};
