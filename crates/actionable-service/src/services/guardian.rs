//! Capability checks for actionable marks
//!
//! The toggle service never inspects roles directly; it asks a
//! `PolicyGuardian`, which the context injects.

use actionable_common::ActionableSettings;
use actionable_core::{ActionRecord, User};

/// Capability checks consulted by the services
pub trait PolicyGuardian: Send + Sync {
    /// Whether `user` may mark posts at all
    fn is_eligible(&self, user: &User, settings: &ActionableSettings) -> bool;

    /// Whether `actor` may remove `record`
    fn can_remove_action(&self, actor: &User, record: &ActionRecord) -> bool;

    /// Whether `viewer` may list who marked a post
    fn can_see_who_actioned(&self, viewer: Option<&User>, settings: &ActionableSettings) -> bool;

    /// Whether `actor` may recompute another user's aggregates
    fn can_reconcile(&self, actor: &User) -> bool;
}

/// Trust-level and staff based policy
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGuardian;

impl PolicyGuardian for DefaultGuardian {
    fn is_eligible(&self, user: &User, settings: &ActionableSettings) -> bool {
        user.active && user.trust_level.meets(settings.min_trust_level)
    }

    fn can_remove_action(&self, actor: &User, record: &ActionRecord) -> bool {
        record.is_authored_by(actor.id) || actor.is_staff()
    }

    fn can_see_who_actioned(&self, viewer: Option<&User>, settings: &ActionableSettings) -> bool {
        settings.show_who_actioned || viewer.is_some_and(User::is_staff)
    }

    fn can_reconcile(&self, actor: &User) -> bool {
        actor.is_staff()
    }
}
