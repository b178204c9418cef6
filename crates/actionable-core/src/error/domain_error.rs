//! Domain errors - error types for the domain layer
//!
//! Every precondition failure of the toggle operations has its own variant so
//! callers can report a machine-readable reason instead of a generic failure.

use thiserror::Error;

use crate::value_objects::{PostId, UserId};

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Toggle Preconditions
    // =========================================================================
    #[error("feature disabled")]
    FeatureDisabled,

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("not eligible")]
    NotEligible,

    #[error("cannot act on own post")]
    SelfAction,

    #[error("post unavailable")]
    ResourceUnavailable,

    #[error("already active")]
    AlreadyActive,

    #[error("quota exceeded")]
    QuotaExceeded,

    #[error("action not found")]
    NotFound,

    #[error("not authorized")]
    NotAuthorized,

    #[error("already removed")]
    AlreadyRemoved,

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("post not found: {0}")]
    PostNotFound(PostId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("validation error: {0}")]
    Validation(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("database error: {0}")]
    Database(String),

    #[error("cache error: {0}")]
    Cache(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::FeatureDisabled => "FEATURE_DISABLED",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NotEligible => "NOT_ELIGIBLE",
            Self::SelfAction => "SELF_ACTION",
            Self::ResourceUnavailable => "RESOURCE_UNAVAILABLE",
            Self::AlreadyActive => "ALREADY_ACTIVE",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::NotFound => "ACTION_NOT_FOUND",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::AlreadyRemoved => "ALREADY_REMOVED",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "PERSISTENCE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
        }
    }

    /// Short lowercase reason, safe to show to clients
    ///
    /// Unlike `Display`, this never includes identifiers or driver messages.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::FeatureDisabled => "feature disabled",
            Self::NotAuthenticated => "not authenticated",
            Self::NotEligible => "not eligible",
            Self::SelfAction => "cannot act on own post",
            Self::ResourceUnavailable => "post unavailable",
            Self::AlreadyActive => "already active",
            Self::QuotaExceeded => "quota exceeded",
            Self::NotFound => "action not found",
            Self::NotAuthorized => "not authorized",
            Self::AlreadyRemoved => "already removed",
            Self::PostNotFound(_) => "post not found",
            Self::UserNotFound(_) => "user not found",
            Self::Validation(_) => "invalid request",
            Self::Database(_) => "persistence error",
            Self::Cache(_) => "cache error",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::PostNotFound(_) | Self::UserNotFound(_)
        )
    }

    /// Check if this is an authentication/authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::NotAuthorized)
    }

    /// Check if this is a conflict with the current state
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyActive | Self::AlreadyRemoved)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this wraps an infrastructure failure rather than a business rule
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Cache(_))
    }
}
