//! Action record entity - one user's actionable mark on one post

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ActionId, PostId, UserId};

/// Discriminator for actionable marks in the shared `post_actions` table
pub const ACTIONABLE_ACTION_TYPE_ID: i32 = 50;

/// Lifecycle state of an action record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Active,
    Removed,
}

impl ActionStatus {
    /// Storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }
}

/// Action record entity
///
/// Records are never hard-deleted. Removal flips `status` to `Removed` and
/// stamps `deleted_at`; toggling on again inserts a fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ActionRecord {
    /// Create a new active record
    pub fn new(id: ActionId, user_id: UserId, post_id: PostId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            post_id,
            status: ActionStatus::Active,
            created_at,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ActionStatus::Active
    }

    /// Check if the record was authored by the given user
    #[inline]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Calendar day (UTC) the record was created on
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Mark the record removed
    pub fn remove(&mut self, at: DateTime<Utc>) {
        self.status = ActionStatus::Removed;
        self.deleted_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ActionRecord {
        let created = Utc.with_ymd_and_hms(2025, 3, 14, 23, 59, 0).unwrap();
        ActionRecord::new(ActionId::new(1), UserId::new(5), PostId::new(9), created)
    }

    #[test]
    fn test_new_record_is_active() {
        let r = record();
        assert!(r.is_active());
        assert!(r.deleted_at.is_none());
        assert!(r.is_authored_by(UserId::new(5)));
    }

    #[test]
    fn test_remove_sets_status_and_timestamp() {
        let mut r = record();
        let at = Utc::now();
        r.remove(at);
        assert_eq!(r.status, ActionStatus::Removed);
        assert_eq!(r.deleted_at, Some(at));
        assert!(!r.is_active());
    }

    #[test]
    fn test_created_on() {
        assert_eq!(record().created_on(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [ActionStatus::Active, ActionStatus::Removed] {
            assert_eq!(ActionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ActionStatus::parse("pending"), None);
    }
}
