//! User entity - the host platform's view of an actor

use serde::{Deserialize, Serialize};

use crate::value_objects::{TrustLevel, UserId};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub trust_level: TrustLevel,
    /// Staff (moderator or admin) capability
    pub staff: bool,
    pub active: bool,
}

impl User {
    /// Create a new active, non-staff user
    pub fn new(id: UserId, username: impl Into<String>, trust_level: TrustLevel) -> Self {
        Self {
            id,
            username: username.into(),
            trust_level,
            staff: false,
            active: true,
        }
    }

    /// Grant staff capability
    #[must_use]
    pub fn with_staff(mut self) -> Self {
        self.staff = true;
        self
    }

    /// Check if user holds the elevated capability
    #[inline]
    pub fn is_staff(&self) -> bool {
        self.staff
    }
}
