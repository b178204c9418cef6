//! User database model

use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub trust_level: i16,
    pub staff: bool,
    pub active: bool,
}
