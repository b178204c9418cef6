//! Daily quota row - per-user, per-day action counter

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// One row of the daily quota table, unique on (user, day)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuota {
    pub user_id: UserId,
    pub actionable_date: NaiveDate,
    pub actionable_count: i32,
}

impl DailyQuota {
    /// Check whether another action fits under `limit`
    #[inline]
    pub fn has_room(&self, limit: i32) -> bool {
        self.actionable_count < limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_room() {
        let row = DailyQuota {
            user_id: UserId::new(1),
            actionable_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            actionable_count: 2,
        };
        assert!(row.has_room(3));
        assert!(!row.has_room(2));
        assert!(!row.has_room(0));
    }
}
