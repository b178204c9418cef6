//! Error handling utilities for repositories

use actionable_core::error::DomainError;
use actionable_core::value_objects::PostId;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::Database(e.to_string())
}

/// Create a "post not found" error
pub fn post_not_found(id: PostId) -> DomainError {
    DomainError::PostNotFound(id)
}
