//! User entity <-> model mapper

use actionable_core::entities::User;
use actionable_core::error::DomainError;
use actionable_core::value_objects::{TrustLevel, UserId};

use crate::models::UserModel;

/// Rows with an out-of-range trust level are treated as corrupt
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let trust_level = TrustLevel::try_from(model.trust_level).map_err(|_| {
            DomainError::Database(format!(
                "user {} has invalid trust_level {}",
                model.id, model.trust_level
            ))
        })?;

        Ok(User {
            id: UserId::new(model.id),
            username: model.username,
            trust_level,
            staff: model.staff,
            active: model.active,
        })
    }
}
