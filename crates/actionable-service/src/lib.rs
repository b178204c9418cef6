//! # actionable-service
//!
//! Application layer containing business logic, services, and DTOs.
//! Depends only on the domain ports; storage and messaging are injected.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{
    ActionableService, DailyQuotaService, DefaultGuardian, PolicyGuardian, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ToggleOutcome,
};

pub use dto::{
    ActionableStateResponse, ActivityItemResponse, ActivityQueryParams, ActorResponse,
    DestroyParams, DirectoryParams, DirectoryResponse, HealthChecks, HealthResponse, PaginatedResponse, ReadinessResponse,
    ToggleFailure, ToggleResponse, UserStatsResponse, UserSummaryResponse, WhoActionedQuery,
};
