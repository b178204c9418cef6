//! Service layer error types
//!
//! Business rule failures stay tagged with their `DomainError` so the HTTP
//! layer can report the reason. Store faults collapse into `Persistence`.

use actionable_common::AppError;
use actionable_core::DomainError;
use std::fmt;
use tracing::error;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// A toggle precondition failed
    Rejected(DomainError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Permission denied
    PermissionDenied { permission: String },

    /// Validation error
    Validation(String),

    /// Store or cache fault; the detail is for logs only
    Persistence(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "{}", e.reason()),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::PermissionDenied { permission } => write!(f, "Permission denied: {permission}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Persistence(_) => write!(f, "persistence error"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Rejected(DomainError::NotAuthenticated) => 403,
            Self::Rejected(_) => 422,
            Self::NotFound { .. } => 404,
            Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
            Self::Persistence(_) => 500,
        }
    }

    /// Error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(e) => e.code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Lowercase reason for the toggle endpoints' `errors` list
    pub fn reason(&self) -> String {
        match self {
            Self::Rejected(e) => e.reason().to_string(),
            Self::NotFound { resource, .. } => format!("{} not found", resource.to_lowercase()),
            Self::PermissionDenied { .. } => "not authorized".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::Persistence(_) => "persistence error".to_string(),
        }
    }

    /// The rejected precondition, if this is one
    pub fn rejection(&self) -> Option<&DomainError> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Database(_) | DomainError::Cache(_) => {
                error!(error = %err, "Persistence failure");
                Self::Persistence(err.to_string())
            }
            DomainError::PostNotFound(id) => Self::not_found("Post", id),
            DomainError::UserNotFound(id) => Self::not_found("User", id),
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::Rejected(other),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rejected(e) => AppError::Domain(e),
            ServiceError::NotFound { resource, id } => AppError::NotFound(format!("{resource} {id}")),
            ServiceError::PermissionDenied { .. } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Persistence(detail) => AppError::Database(detail),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actionable_core::PostId;

    #[test]
    fn test_rejections_are_unprocessable() {
        for e in [
            DomainError::FeatureDisabled,
            DomainError::NotEligible,
            DomainError::SelfAction,
            DomainError::AlreadyActive,
            DomainError::QuotaExceeded,
            DomainError::NotAuthorized,
        ] {
            assert_eq!(ServiceError::from(e).status_code(), 422);
        }
    }

    #[test]
    fn test_not_authenticated_is_forbidden() {
        let err = ServiceError::from(DomainError::NotAuthenticated);
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.reason(), "not authenticated");
    }

    #[test]
    fn test_database_errors_become_persistence() {
        let err = ServiceError::from(DomainError::Database("relation does not exist".to_string()));
        assert!(matches!(err, ServiceError::Persistence(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "persistence error");
        assert_eq!(err.reason(), "persistence error");
    }

    #[test]
    fn test_unknown_post_is_not_found() {
        let err = ServiceError::from(DomainError::PostNotFound(PostId::new(9)));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.reason(), "post not found");
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::not_found("User", 456).into();
        assert_eq!(app_err.status_code(), 404);

        let app_err: AppError = ServiceError::Persistence("x".to_string()).into();
        assert_eq!(app_err.status_code(), 500);
    }
}
