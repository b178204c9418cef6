//! Business logic services
//!
//! This module contains the use cases behind the HTTP surface: the toggle,
//! the daily quota, and the read-side listings.

pub mod actionable;
pub mod context;
pub mod error;
pub mod guardian;
pub mod quota;
pub mod sweeper;

// Re-export all services for convenience
pub use actionable::{ActionableService, ToggleOutcome, SUMMARY_TOP_USERS};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use guardian::{DefaultGuardian, PolicyGuardian};
pub use quota::{today, DailyQuotaService};
pub use sweeper::{spawn_purge_sweeper, PURGE_INTERVAL};
