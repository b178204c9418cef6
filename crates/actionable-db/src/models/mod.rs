//! Database models - SQLx-compatible structs for PostgreSQL tables

mod action;
mod post;
mod stats;
mod user;

pub use action::{ActivityModel, PostActionModel};
pub use post::PostModel;
pub use stats::{ActorModel, UserCountModel, UserStatsModel};
pub use user::UserModel;
