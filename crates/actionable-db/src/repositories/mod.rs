//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in actionable-core.

mod action;
mod daily_quota;
mod error;
mod health;
mod post;
mod user;
mod user_stats;

pub use action::{PgActionRepository, PgActionUnitOfWork};
pub use daily_quota::PgDailyQuotaRepository;
pub use health::PgHealthProbe;
pub use post::PgPostRepository;
pub use user::PgUserRepository;
pub use user_stats::PgUserStatsRepository;
