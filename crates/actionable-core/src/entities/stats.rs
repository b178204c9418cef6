//! Aggregate user stats - running totals of marks given and received

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Which aggregate a toggle adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    /// Marks the user placed on other users' posts
    Given,
    /// Marks other users placed on this user's posts
    Received,
}

impl StatKind {
    /// Column on `user_stats` that stores this aggregate
    ///
    /// This is the only place the kind is mapped to storage; never build the
    /// column name from user input.
    pub fn column(self) -> &'static str {
        match self {
            Self::Given => "actionable_given",
            Self::Received => "actionable_received",
        }
    }
}

/// Per-user aggregate totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: UserId,
    pub actionable_given: i32,
    pub actionable_received: i32,
}

impl UserStats {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Read one aggregate
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Given => self.actionable_given,
            StatKind::Received => self.actionable_received,
        }
    }

    /// Apply a signed delta to one aggregate, never dropping below zero
    pub fn apply(&mut self, kind: StatKind, delta: i32) {
        let slot = match kind {
            StatKind::Given => &mut self.actionable_given,
            StatKind::Received => &mut self.actionable_received,
        };
        *slot = slot.saturating_add(delta).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns() {
        assert_eq!(StatKind::Given.column(), "actionable_given");
        assert_eq!(StatKind::Received.column(), "actionable_received");
    }

    #[test]
    fn test_apply_adjusts_only_target() {
        let mut stats = UserStats::new(UserId::new(1));
        stats.apply(StatKind::Given, 1);
        stats.apply(StatKind::Given, 1);
        stats.apply(StatKind::Received, 1);
        assert_eq!(stats.get(StatKind::Given), 2);
        assert_eq!(stats.get(StatKind::Received), 1);
    }

    #[test]
    fn test_apply_clamps_at_zero() {
        let mut stats = UserStats::new(UserId::new(1));
        stats.apply(StatKind::Received, -1);
        assert_eq!(stats.actionable_received, 0);
    }
}
