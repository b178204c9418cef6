//! Typed 64-bit identifiers
//!
//! The host platform keys users, topics, and posts by `BIGINT` primary keys.
//! Wrapping them in distinct newtypes keeps a `PostId` from being passed where
//! a `UserId` is expected. All of them serialize as plain JSON numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing an identifier from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid id format")]
    InvalidFormat,

    #[error("id must be positive")]
    NotPositive,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create from a raw i64 value
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = s.parse::<i64>().map_err(|_| IdParseError::InvalidFormat)?;
                if id <= 0 {
                    return Err(IdParseError::NotPositive);
                }
                Ok(Self(id))
            }
        }
    };
}

define_id!(
    /// Host user identifier
    UserId
);
define_id!(
    /// Host post identifier
    PostId
);
define_id!(
    /// Host topic identifier (the pub/sub fanout key)
    TopicId
);
define_id!(
    /// Action record identifier
    ActionId
);
