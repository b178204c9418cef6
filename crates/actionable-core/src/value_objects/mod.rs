//! Value objects - immutable types that represent domain concepts

mod ids;
mod trust_level;

pub use ids::{ActionId, IdParseError, PostId, TopicId, UserId};
pub use trust_level::TrustLevel;
