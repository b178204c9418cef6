//! Trust level - the host platform's eligibility tier (0..=4)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// User trust level, from 0 (new user) to 4 (leader)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct TrustLevel(u8);

impl TrustLevel {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(4);

    /// Create a trust level, rejecting values outside 0..=4
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if level > Self::MAX.0 {
            return Err(DomainError::Validation(format!(
                "trust level must be between 0 and 4, got {level}"
            )));
        }
        Ok(Self(level))
    }

    /// Get the raw level
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Check whether this level satisfies a required minimum
    #[inline]
    pub fn meets(self, minimum: TrustLevel) -> bool {
        self >= minimum
    }
}

impl TryFrom<i16> for TrustLevel {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let level = u8::try_from(value).map_err(|_| {
            DomainError::Validation(format!("trust level must be between 0 and 4, got {value}"))
        })?;
        Self::new(level)
    }
}

impl From<TrustLevel> for i16 {
    fn from(level: TrustLevel) -> Self {
        i16::from(level.0)
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
