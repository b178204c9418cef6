//! Domain entities - core business objects

mod action;
mod daily_quota;
mod post;
mod stats;
mod summary;
mod user;

pub use action::{ActionRecord, ActionStatus, ACTIONABLE_ACTION_TYPE_ID};
pub use daily_quota::DailyQuota;
pub use post::Post;
pub use stats::{StatKind, UserStats};
pub use summary::{ActivityItem, ActorSummary, UserCount, UserSummary};
pub use user::User;
