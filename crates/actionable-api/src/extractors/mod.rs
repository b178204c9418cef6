//! Axum extractors for request handling
//!
//! Custom extractors for authentication, typed path ids, and validated queries.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{PostIdPath, UserIdPath};
pub use validated::ValidatedQuery;
